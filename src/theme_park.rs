//! High-level park service with integrated storage.
//!
//! [`ThemePark`] combines a [`Storage`] backend with an owned
//! [`DiscountTable`] and keeps a write-through cache of guests, tickets and
//! reservations. Every mutating operation validates its input and resolves
//! referenced records before issuing identifiers or writing anything.
//!
//! Operations that write more than one collection save them in turn. If a
//! later save fails, the collections already written are saved back to
//! their previous contents and the cache is left as it was.

use alloc::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{Result, ThemeParkError};
use crate::models::{
    Admin, AdminId, Attraction, AttractionId, Category, Event, EventId, Guest, GuestId, Payment,
    PaymentId, PaymentMethod, Reservation, ReservationId, Service, ServiceId, Ticket, TicketId,
    TicketType, ValidityReport,
};
use crate::pricing::{DiscountTable, Quote, QuoteRequest, check_price};
use crate::storage::{Record, Storage};

/// Builds a [`ThemeParkError::NotFound`].
const fn not_found(category: Category, id: u64) -> ThemeParkError {
    ThemeParkError::NotFound { category, id }
}

/// Builder for [`ThemePark`].
#[derive(Debug)]
pub struct ThemeParkBuilder<S: Storage> {
    /// Storage backend.
    storage: Option<S>,
    /// Ticket defaults that replace the stored ones.
    discounts: Option<DiscountTable>,
}

impl<S: Storage> ThemeParkBuilder<S> {
    /// Sets the storage backend.
    #[inline]
    #[must_use]
    pub fn storage(mut self, storage: S) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Overrides the ticket defaults loaded from storage.
    #[inline]
    #[must_use]
    pub fn discounts(mut self, discounts: DiscountTable) -> Self {
        self.discounts = Some(discounts);
        self
    }

    /// Builds the service and loads its cache from storage.
    ///
    /// Without an explicit table the ticket defaults come from storage,
    /// falling back to the seed values when none were saved.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Storage`] if no storage was provided, or
    /// an error if the ticket defaults or the cached collections cannot be
    /// loaded.
    #[inline]
    pub fn build(self) -> Result<ThemePark<S>> {
        let storage = self
            .storage
            .ok_or_else(|| ThemeParkError::Storage("storage backend is required".into()))?;
        let discounts = match self.discounts {
            Some(table) => table,
            None => storage.load_discounts()?.unwrap_or_default(),
        };
        let mut park = ThemePark {
            storage,
            discounts,
            guests: Vec::new(),
            tickets: Vec::new(),
            reservations: Vec::new(),
            admin: None,
        };
        park.refresh()?;
        Ok(park)
    }
}

/// Park management service.
///
/// Guests, tickets and reservations are served from memory and written
/// through to storage on every change. Admins, payments, attractions,
/// events and services are read from storage on demand.
#[derive(Debug)]
pub struct ThemePark<S: Storage> {
    /// Storage backend.
    storage: S,
    /// Ticket defaults used for quoting and discount management.
    discounts: DiscountTable,
    /// Cached guests.
    guests: Vec<Guest>,
    /// Cached tickets.
    tickets: Vec<Ticket>,
    /// Cached reservations.
    reservations: Vec<Reservation>,
    /// Admin signed in for this session.
    admin: Option<Admin>,
}

impl<S: Storage> ThemePark<S> {
    /// Creates a new builder for configuring the service.
    #[inline]
    #[must_use]
    pub const fn builder() -> ThemeParkBuilder<S> {
        ThemeParkBuilder {
            storage: None,
            discounts: None,
        }
    }

    /// Returns the storage backend.
    #[inline]
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Reloads the cached collections from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    #[tracing::instrument(skip_all)]
    pub fn refresh(&mut self) -> Result<()> {
        self.guests = self.storage.load()?;
        self.tickets = self.storage.load()?;
        self.reservations = self.storage.load()?;
        tracing::debug!(
            guests = self.guests.len(),
            tickets = self.tickets.len(),
            reservations = self.reservations.len(),
            "loaded cache"
        );
        Ok(())
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Issues the next identifier for `category`.
    fn issue_id<I: From<u64>>(&self, category: Category) -> Result<I> {
        let id = self.storage.next_id(category.as_str())?;
        tracing::debug!(%category, id, "allocated id");
        Ok(I::from(id))
    }

    /// Saves `previous` back if `result` failed, then passes `result` on.
    ///
    /// A failing restore is logged; the original error is returned.
    fn or_restore<R: Record, T>(&self, previous: &[R], result: Result<T>) -> Result<T> {
        match result {
            Ok(output) => Ok(output),
            Err(err) => {
                if let Err(restore) = self.storage.save(previous) {
                    tracing::warn!(
                        category = %R::CATEGORY,
                        error = %restore,
                        "failed to restore collection after a partial write"
                    );
                }
                Err(err)
            }
        }
    }

    /// Applies `op` to one stored ticket and refreshes the ticket cache.
    fn with_ticket<T, F>(&mut self, id: TicketId, op: F) -> Result<T>
    where
        F: FnOnce(&mut Ticket) -> Result<T>,
    {
        let (output, stored) = self.storage.modify(|tickets: &mut Vec<Ticket>| {
            let ticket = tickets
                .iter_mut()
                .find(|ticket| ticket.id() == id)
                .ok_or_else(|| not_found(Category::Ticket, id.into_inner()))?;
            let output = op(ticket)?;
            Ok((output, tickets.clone()))
        })?;
        self.tickets = stored;
        Ok(output)
    }

    /// Rewrites the embedded copy of `payment` in every stored reservation
    /// that holds it. Nothing is written if no cached reservation does.
    fn sync_embedded_payment(&mut self, payment: &Payment) -> Result<()> {
        let holds = |reservation: &Reservation| {
            reservation
                .payment()
                .is_some_and(|embedded| embedded.id() == payment.id())
        };
        if !self.reservations.iter().any(holds) {
            return Ok(());
        }
        self.reservations = self.storage.modify(|reservations: &mut Vec<Reservation>| {
            for embedded in reservations.iter_mut().filter_map(Reservation::payment_mut) {
                if embedded.id() == payment.id() {
                    embedded.clone_from(payment);
                }
            }
            Ok(reservations.clone())
        })?;
        Ok(())
    }

    /// Detaches payment `payment_id` from every stored reservation holding
    /// it. Returns whether any reservation was changed.
    fn detach_payment(&mut self, payment_id: PaymentId) -> Result<bool> {
        let holds = |reservation: &Reservation| {
            reservation
                .payment()
                .is_some_and(|payment| payment.id() == payment_id)
        };
        if !self.reservations.iter().any(holds) {
            return Ok(false);
        }
        self.reservations = self.storage.modify(|reservations: &mut Vec<Reservation>| {
            for reservation in &mut *reservations {
                if holds(reservation) {
                    let _payment = reservation.take_payment();
                }
            }
            Ok(reservations.clone())
        })?;
        Ok(true)
    }

    // ── Guests ──────────────────────────────────────────────────────

    /// Registers a new guest.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `email` has no `@`, or an
    /// error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn add_guest<N, E, P>(&mut self, name: N, email: E, phone_number: P) -> Result<Guest>
    where
        N: Into<String>,
        E: Into<String>,
        P: Into<String>,
    {
        let address = email.into();
        Guest::validate_email(&address)?;
        let id: GuestId = self.issue_id(Category::Guest)?;
        let guest = Guest::new(id, name, address, phone_number)?;
        self.storage.add(Category::Guest, guest.clone())?;
        self.guests.push(guest.clone());
        tracing::debug!(%id, "added guest");
        Ok(guest)
    }

    /// Replaces the stored guest that shares `guest`'s identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if no such guest exists, or an
    /// error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn update_guest(&mut self, guest: Guest) -> Result<()> {
        let id = guest.id();
        self.guests = self.storage.modify(|guests: &mut Vec<Guest>| {
            let slot = guests
                .iter_mut()
                .find(|existing| existing.id() == id)
                .ok_or_else(|| not_found(Category::Guest, id.into_inner()))?;
            *slot = guest;
            Ok(guests.clone())
        })?;
        Ok(())
    }

    /// Removes a guest together with every ticket they own.
    ///
    /// Deleting an unknown guest is not an error; both collections are
    /// saved either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn delete_guest(&mut self, guest_id: GuestId) -> Result<()> {
        let mut guests = self.guests.clone();
        guests.retain(|guest| guest.id() != guest_id);
        let mut tickets = self.tickets.clone();
        tickets.retain(|ticket| ticket.guest_id() != Some(guest_id));
        tracing::debug!(
            %guest_id,
            removed_tickets = self.tickets.len() - tickets.len(),
            "deleting guest"
        );
        self.storage.save(&guests)?;
        let saved = self.storage.save(&tickets);
        self.or_restore(&self.guests, saved)?;
        self.guests = guests;
        self.tickets = tickets;
        Ok(())
    }

    /// Returns every guest.
    #[inline]
    #[must_use]
    pub fn get_all_guests(&self) -> &[Guest] {
        &self.guests
    }

    /// Looks up a guest by identifier.
    #[inline]
    #[must_use]
    pub fn guest(&self, id: GuestId) -> Option<&Guest> {
        self.guests.iter().find(|guest| guest.id() == id)
    }

    /// Looks up a guest by email, ignoring ASCII case and surrounding
    /// whitespace. Used for guest sign-in.
    #[inline]
    #[must_use]
    pub fn find_guest_by_email(&self, email: &str) -> Option<&Guest> {
        let wanted = email.trim();
        self.guests
            .iter()
            .find(|guest| guest.email().eq_ignore_ascii_case(wanted))
    }

    // ── Tickets ─────────────────────────────────────────────────────

    /// Sells a ticket to an existing guest.
    ///
    /// The ticket starts active with no discount and is appended to the
    /// guest's purchase history.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `price` is negative or not
    /// a finite number, [`ThemeParkError::NotFound`] if the guest does not
    /// exist, or an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn add_ticket_to_guest(
        &mut self,
        guest_id: GuestId,
        ticket_type: TicketType,
        price: f64,
        validity_period: u32,
    ) -> Result<Ticket> {
        check_price(price)?;
        let mut guests = self.guests.clone();
        let guest = guests
            .iter_mut()
            .find(|guest| guest.id() == guest_id)
            .ok_or_else(|| not_found(Category::Guest, guest_id.into_inner()))?;
        let id: TicketId = self.issue_id(Category::Ticket)?;
        let ticket = Ticket::new(id, ticket_type, price, validity_period, Some(guest_id))?;
        guest.record_purchase(id);

        let mut tickets = self.tickets.clone();
        tickets.push(ticket.clone());
        self.storage.save(&tickets)?;
        let saved = self.storage.save(&guests);
        self.or_restore(&self.tickets, saved)?;
        self.tickets = tickets;
        self.guests = guests;
        tracing::debug!(%id, %guest_id, %ticket_type, "sold ticket");
        Ok(ticket)
    }

    /// Quotes `request` and sells the resulting tickets to a guest.
    ///
    /// Each ticket is priced at the quoted total divided by the quantity and
    /// takes its validity period from the discount table.
    ///
    /// # Errors
    ///
    /// Returns the quoting error, [`ThemeParkError::NotFound`] if the guest
    /// does not exist, or an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn purchase_tickets(
        &mut self,
        guest_id: GuestId,
        request: &QuoteRequest,
    ) -> Result<(Quote, Vec<Ticket>)> {
        let quote = self.discounts.quote(request)?;
        if self.guest(guest_id).is_none() {
            return Err(not_found(Category::Guest, guest_id.into_inner()));
        }
        let unit_price = quote.total / f64::from(quote.quantity);
        let validity_period = self.discounts.get(quote.ticket_type).validity_period;
        let mut sold = Vec::new();
        for _ in 0..quote.quantity {
            sold.push(self.add_ticket_to_guest(
                guest_id,
                quote.ticket_type,
                unit_price,
                validity_period,
            )?);
        }
        Ok((quote, sold))
    }

    /// Returns every ticket owned by `guest_id`, in sale order.
    #[inline]
    #[must_use]
    pub fn get_tickets_by_guest(&self, guest_id: GuestId) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|ticket| ticket.guest_id() == Some(guest_id))
            .collect()
    }

    /// Returns every ticket.
    #[inline]
    #[must_use]
    pub fn get_all_tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Looks up a ticket by identifier.
    #[inline]
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| ticket.id() == id)
    }

    /// Sets the default discount for `ticket_type` and re-rates every
    /// stored ticket of that type.
    ///
    /// Returns the number of tickets re-rated.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] unless `percent` is within
    /// `0..=100`, or an error if the storage backend fails. Table and
    /// tickets are left untouched on error.
    #[tracing::instrument(skip_all)]
    pub fn modify_ticket_discount(&mut self, ticket_type: TicketType, percent: f64) -> Result<usize> {
        let mut table = self.discounts.clone();
        table.set_discount(ticket_type, percent)?;
        let mut tickets = self.tickets.clone();
        let mut rerated: usize = 0;
        for ticket in tickets
            .iter_mut()
            .filter(|ticket| ticket.ticket_type() == ticket_type)
        {
            ticket.set_discount(percent)?;
            rerated += 1;
        }
        self.storage.save(&tickets)?;
        let saved = self.storage.save_discounts(&table);
        self.or_restore(&self.tickets, saved)?;
        self.tickets = tickets;
        self.discounts = table;
        tracing::info!(%ticket_type, percent, rerated, "modified ticket discount");
        Ok(rerated)
    }

    /// Sets the default discount for `ticket_type` without touching stored
    /// tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] unless `percent` is within
    /// `0..=100`, or an error if the storage backend fails. The table is
    /// left untouched on error.
    #[inline]
    pub fn update_discount(&mut self, ticket_type: TicketType, percent: f64) -> Result<()> {
        let mut table = self.discounts.clone();
        table.set_discount(ticket_type, percent)?;
        self.storage.save_discounts(&table)?;
        self.discounts = table;
        tracing::info!(%ticket_type, percent, "updated default discount");
        Ok(())
    }

    /// Returns the ticket defaults.
    #[inline]
    #[must_use]
    pub const fn discounts(&self) -> &DiscountTable {
        &self.discounts
    }

    /// Prices a purchase against the current ticket defaults.
    ///
    /// # Errors
    ///
    /// See [`DiscountTable::quote`].
    #[inline]
    pub fn quote_tickets(&self, request: &QuoteRequest) -> Result<Quote> {
        self.discounts.quote(request)
    }

    /// Applies a named discount rule to a stored ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the ticket does not exist, or
    /// an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn apply_ticket_discount(
        &mut self,
        ticket_id: TicketId,
        rule: &str,
        group_size: u32,
    ) -> Result<Ticket> {
        self.with_ticket(ticket_id, |ticket| {
            ticket.apply_discount(rule, group_size);
            Ok(ticket.clone())
        })
    }

    /// Checks a stored ticket's validity window, expiring it if elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the ticket does not exist, or
    /// an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn validate_ticket(&mut self, ticket_id: TicketId) -> Result<ValidityReport> {
        self.with_ticket(ticket_id, |ticket| Ok(ticket.validate()))
    }

    /// Cancels an active ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the ticket does not exist,
    /// [`ThemeParkError::Validation`] if it is not active, or an error if
    /// the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn cancel_ticket(&mut self, ticket_id: TicketId) -> Result<()> {
        self.with_ticket(ticket_id, Ticket::cancel)
    }

    /// Redeems an active ticket at the gate.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the ticket does not exist,
    /// [`ThemeParkError::Validation`] if it is not active, or an error if
    /// the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn redeem_ticket(&mut self, ticket_id: TicketId) -> Result<()> {
        self.with_ticket(ticket_id, Ticket::redeem)
    }

    /// Returns a ticket to the active state.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the ticket does not exist, or
    /// an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn reactivate_ticket(&mut self, ticket_id: TicketId) -> Result<()> {
        self.with_ticket(ticket_id, |ticket| {
            ticket.activate();
            Ok(())
        })
    }

    /// Counts stored tickets per purchase date, oldest first.
    #[must_use]
    pub fn ticket_sales_by_date(&self) -> BTreeMap<NaiveDate, usize> {
        let mut sales = BTreeMap::new();
        for ticket in &self.tickets {
            *sales.entry(ticket.purchase_date()).or_insert(0_usize) += 1;
        }
        sales
    }

    // ── Reservations ────────────────────────────────────────────────

    /// Books `tickets` for an existing guest.
    ///
    /// The signed-in admin, if any, is recorded as admin in charge.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the guest does not exist, or
    /// an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn make_reservation(
        &mut self,
        guest_id: GuestId,
        tickets: Vec<Ticket>,
    ) -> Result<Reservation> {
        let guest = self
            .guest(guest_id)
            .cloned()
            .ok_or_else(|| not_found(Category::Guest, guest_id.into_inner()))?;
        let id: ReservationId = self.issue_id(Category::Reservation)?;
        let reservation = Reservation::new(id, tickets, guest, self.admin.clone());
        self.storage
            .add(Category::Reservation, reservation.clone())?;
        self.reservations.push(reservation.clone());
        tracing::debug!(%id, %guest_id, total = reservation.total_amount(), "made reservation");
        Ok(reservation)
    }

    /// Books stored tickets, given by identifier, for an existing guest.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the guest or any ticket does
    /// not exist, or an error if the storage backend fails.
    #[inline]
    pub fn make_reservation_for_tickets(
        &mut self,
        guest_id: GuestId,
        ticket_ids: &[TicketId],
    ) -> Result<Reservation> {
        let tickets = ticket_ids
            .iter()
            .map(|&id| {
                self.ticket(id)
                    .cloned()
                    .ok_or_else(|| not_found(Category::Ticket, id.into_inner()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.make_reservation(guest_id, tickets)
    }

    /// Returns every reservation.
    #[inline]
    #[must_use]
    pub fn get_all_reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Looks up a reservation by identifier.
    #[inline]
    #[must_use]
    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|reservation| reservation.id() == id)
    }

    /// Renders the invoice of a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the reservation does not
    /// exist.
    #[inline]
    pub fn reservation_invoice(&self, id: ReservationId) -> Result<String> {
        self.reservation(id)
            .map(Reservation::generate_invoice)
            .ok_or_else(|| not_found(Category::Reservation, id.into_inner()))
    }

    // ── Payments ────────────────────────────────────────────────────

    /// Pays for a reservation that has no payment yet.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::Validation`] if `amount` is negative or not
    /// a finite number or the reservation is already paid,
    /// [`ThemeParkError::NotFound`] if the reservation does not exist, or
    /// an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn process_payment(
        &mut self,
        reservation_id: ReservationId,
        amount: f64,
        method: PaymentMethod,
    ) -> Result<Payment> {
        check_price(amount)?;
        let mut reservations = self.reservations.clone();
        let reservation = reservations
            .iter_mut()
            .find(|reservation| reservation.id() == reservation_id)
            .ok_or_else(|| not_found(Category::Reservation, reservation_id.into_inner()))?;
        if let Some(existing) = reservation.payment() {
            return Err(ThemeParkError::validation(format!(
                "reservation {reservation_id} already has payment {}",
                existing.id()
            )));
        }
        let id: PaymentId = self.issue_id(Category::Payment)?;
        let payment = Payment::new(id, amount, method)?;
        reservation.set_payment(payment.clone())?;
        self.storage.save(&reservations)?;
        let added = self.storage.add(Category::Payment, payment.clone());
        self.or_restore(&self.reservations, added)?;
        self.reservations = reservations;
        tracing::debug!(%id, %reservation_id, amount, "processed payment");
        Ok(payment)
    }

    /// Changes how a payment was made, leaving its amount untouched.
    ///
    /// The copy embedded in the paid reservation is updated too.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the payment does not exist,
    /// or an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn update_payment_method(
        &mut self,
        payment_id: PaymentId,
        method: PaymentMethod,
    ) -> Result<Payment> {
        let previous: Vec<Payment> = self.storage.load()?;
        let payment = self.storage.modify(|payments: &mut Vec<Payment>| {
            let payment = payments
                .iter_mut()
                .find(|payment| payment.id() == payment_id)
                .ok_or_else(|| not_found(Category::Payment, payment_id.into_inner()))?;
            payment.set_method(method);
            Ok(payment.clone())
        })?;
        let synced = self.sync_embedded_payment(&payment);
        self.or_restore(&previous, synced)?;
        tracing::debug!(%payment_id, %method, "updated payment method");
        Ok(payment)
    }

    /// Refunds part of a payment made for a reservation.
    ///
    /// Returns the refund receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the payment or reservation
    /// does not exist, [`ThemeParkError::Validation`] if the amount is not
    /// positive or exceeds the amount paid, or an error if the storage
    /// backend fails.
    #[tracing::instrument(skip_all)]
    pub fn refund_payment(
        &mut self,
        payment_id: PaymentId,
        reservation_id: ReservationId,
        amount: f64,
    ) -> Result<String> {
        if self.reservation(reservation_id).is_none() {
            return Err(not_found(Category::Reservation, reservation_id.into_inner()));
        }
        let previous: Vec<Payment> = self.storage.load()?;
        let (receipt, payment) = self.storage.modify(|payments: &mut Vec<Payment>| {
            let payment = payments
                .iter_mut()
                .find(|payment| payment.id() == payment_id)
                .ok_or_else(|| not_found(Category::Payment, payment_id.into_inner()))?;
            let receipt = payment.issue_refund(reservation_id, amount)?;
            Ok((receipt, payment.clone()))
        })?;
        let synced = self.sync_embedded_payment(&payment);
        self.or_restore(&previous, synced)?;
        tracing::info!(%payment_id, %reservation_id, amount, "issued refund");
        Ok(receipt)
    }

    /// Deletes a payment and detaches it from its reservation.
    ///
    /// Returns `false` if no such payment was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn delete_payment(&mut self, payment_id: PaymentId) -> Result<bool> {
        let previous: Vec<Payment> = self.storage.load()?;
        let removed = self.storage.modify(|payments: &mut Vec<Payment>| {
            let before = payments.len();
            payments.retain(|payment| payment.id() != payment_id);
            Ok(payments.len() != before)
        })?;
        let detach = self.detach_payment(payment_id);
        let detached = self.or_restore(&previous, detach)?;
        tracing::debug!(%payment_id, removed, detached, "deleted payment");
        Ok(removed)
    }

    /// Returns every payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    #[inline]
    pub fn get_all_payments(&self) -> Result<Vec<Payment>> {
        self.storage.load()
    }

    // ── Admins ──────────────────────────────────────────────────────

    /// Creates an admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn add_admin<N: Into<String>, E: Into<String>>(
        &mut self,
        name: N,
        email: E,
    ) -> Result<Admin> {
        let id: AdminId = self.issue_id(Category::Admin)?;
        let admin = Admin::new(id, name, email);
        self.storage.add(Category::Admin, admin.clone())?;
        tracing::debug!(%id, "added admin");
        Ok(admin)
    }

    /// Returns every admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    #[inline]
    pub fn get_all_admins(&self) -> Result<Vec<Admin>> {
        self.storage.load()
    }

    /// Signs an admin in by email and identifier.
    ///
    /// Reservations made afterwards record this admin as admin in charge.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if no admin matches both, or an
    /// error if the storage backend fails to read.
    #[tracing::instrument(skip_all)]
    pub fn sign_in_admin(&mut self, email: &str, id: AdminId) -> Result<Admin> {
        let admin = self
            .storage
            .load::<Admin>()?
            .into_iter()
            .find(|admin| admin.matches_login(email, id))
            .ok_or_else(|| not_found(Category::Admin, id.into_inner()))?;
        tracing::info!(%id, "admin signed in");
        self.admin = Some(admin.clone());
        Ok(admin)
    }

    /// Clears the admin context.
    #[inline]
    pub fn sign_out_admin(&mut self) {
        self.admin = None;
    }

    /// Returns the signed-in admin, if any.
    #[inline]
    #[must_use]
    pub const fn signed_in_admin(&self) -> Option<&Admin> {
        self.admin.as_ref()
    }

    // ── Attractions, events and services ────────────────────────────

    /// Adds an attraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn add_attraction<N, L, D>(
        &mut self,
        name: N,
        location: L,
        description: D,
    ) -> Result<Attraction>
    where
        N: Into<String>,
        L: Into<String>,
        D: Into<String>,
    {
        let id: AttractionId = self.issue_id(Category::Attraction)?;
        let attraction = Attraction::new(id, name, location, description);
        self.storage.add(Category::Attraction, attraction.clone())?;
        tracing::debug!(%id, "added attraction");
        Ok(attraction)
    }

    /// Returns every attraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    #[inline]
    pub fn get_all_attractions(&self) -> Result<Vec<Attraction>> {
        self.storage.load()
    }

    /// Records or clears an attraction's rider capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeParkError::NotFound`] if the attraction does not
    /// exist, or an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn update_attraction_capacity(
        &mut self,
        id: AttractionId,
        capacity: Option<u32>,
    ) -> Result<Attraction> {
        self.storage.modify(|attractions: &mut Vec<Attraction>| {
            let attraction = attractions
                .iter_mut()
                .find(|attraction| attraction.id() == id)
                .ok_or_else(|| not_found(Category::Attraction, id.into_inner()))?;
            attraction.set_capacity(capacity);
            Ok(attraction.clone())
        })
    }

    /// Schedules an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn add_event<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        date: NaiveDate,
        description: D,
    ) -> Result<Event> {
        let id: EventId = self.issue_id(Category::Event)?;
        let event = Event::new(id, name, date, description);
        self.storage.add(Category::Event, event.clone())?;
        tracing::debug!(%id, %date, "added event");
        Ok(event)
    }

    /// Returns every event.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    #[inline]
    pub fn get_all_events(&self) -> Result<Vec<Event>> {
        self.storage.load()
    }

    /// Adds a park service.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    #[tracing::instrument(skip_all)]
    pub fn add_service<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        description: D,
    ) -> Result<Service> {
        let id: ServiceId = self.issue_id(Category::Service)?;
        let service = Service::new(id, name, description);
        self.storage.add(Category::Service, service.clone())?;
        tracing::debug!(%id, "added service");
        Ok(service)
    }

    /// Returns every park service.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    #[inline]
    pub fn get_all_services(&self) -> Result<Vec<Service>> {
        self.storage.load()
    }
}
