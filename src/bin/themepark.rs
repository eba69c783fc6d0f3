//! Command-line front end for the park.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use themepark_rs::error::ThemeParkError;
use themepark_rs::models::{
    Admin, AdminId, Attraction, AttractionId, Category, Event, Guest, GuestId, Payment, PaymentId,
    PaymentMethod, Reservation, ReservationId, Service, Ticket, TicketId, TicketType,
};
use themepark_rs::pricing::{Quote, QuoteRequest};
use themepark_rs::storage::{FileStorage, Storage};
use themepark_rs::theme_park::ThemePark;

/// Environment variable overriding the data directory.
const DATA_DIR_ENV: &str = "THEMEPARK_DATA_DIR";

/// Placeholder for empty table cells.
const EMPTY_CELL: &str = "-";

/// Theme park management: guests, tickets, reservations and payments.
#[derive(Debug, Parser)]
#[command(name = "themepark", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Command groups.
#[derive(Debug, Subcommand)]
enum Command {
    /// Manage guests.
    #[command(subcommand)]
    Guest(GuestCommand),
    /// Sell and manage tickets.
    #[command(subcommand)]
    Ticket(TicketCommand),
    /// Book reservations.
    #[command(subcommand)]
    Reservation(ReservationCommand),
    /// Record payments.
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// Manage admin accounts.
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Manage attractions.
    #[command(subcommand)]
    Attraction(AttractionCommand),
    /// Manage scheduled events.
    #[command(subcommand)]
    Event(EventCommand),
    /// Manage park services.
    #[command(subcommand)]
    Service(ServiceCommand),
    /// Show ticket sales per day.
    Sales,
    /// Price a purchase without selling anything.
    Quote(QuoteArgs),
}

/// `guest` actions.
#[derive(Debug, Subcommand)]
enum GuestCommand {
    /// Register a guest.
    Add {
        /// Full name.
        name: String,
        /// Email address.
        email: String,
        /// Phone number.
        phone: String,
    },
    /// List all guests.
    List,
    /// Change fields of an existing guest.
    Update(GuestUpdateArgs),
    /// Remove a guest and their tickets.
    Delete {
        /// Guest to remove.
        id: GuestId,
    },
    /// Look up a guest by email.
    Find {
        /// Email address (case-insensitive).
        email: String,
    },
}

/// Arguments for `guest update`.
#[derive(Debug, Args)]
struct GuestUpdateArgs {
    /// Guest to change.
    id: GuestId,
    /// New name.
    #[arg(long)]
    name: Option<String>,
    /// New email address.
    #[arg(long)]
    email: Option<String>,
    /// New phone number.
    #[arg(long)]
    phone: Option<String>,
    /// New age.
    #[arg(long)]
    age: Option<u32>,
}

/// `ticket` actions.
#[derive(Debug, Subcommand)]
enum TicketCommand {
    /// Sell one ticket at an explicit or default price.
    Sell {
        /// Owning guest.
        guest: GuestId,
        /// Ticket type (single-day, two-day, annual, child, group, vip).
        ticket_type: TicketType,
        /// Price; defaults to the type's list price.
        #[arg(long)]
        price: Option<f64>,
        /// Validity in days; defaults to the type's standard period.
        #[arg(long)]
        validity: Option<u32>,
    },
    /// Quote and sell tickets in one step.
    Buy {
        /// Owning guest.
        guest: GuestId,
        /// Purchase to make.
        #[command(flatten)]
        quote: QuoteArgs,
    },
    /// List tickets, optionally for one guest.
    List {
        /// Only tickets owned by this guest.
        #[arg(long)]
        guest: Option<GuestId>,
    },
    /// Set the default discount of a type and re-rate its tickets.
    Discount {
        /// Ticket type.
        ticket_type: TicketType,
        /// Discount percentage (0-100).
        percent: f64,
    },
    /// Apply a named discount rule to one ticket.
    Apply {
        /// Ticket to discount.
        id: TicketId,
        /// Rule name (online purchase, renewal, group).
        rule: String,
        /// Party size for the group rule.
        #[arg(long, default_value_t = 1)]
        group_size: u32,
    },
    /// Check whether a ticket is still valid.
    Validate {
        /// Ticket to check.
        id: TicketId,
    },
    /// Cancel an active ticket.
    Cancel {
        /// Ticket to cancel.
        id: TicketId,
    },
    /// Redeem an active ticket.
    Redeem {
        /// Ticket to redeem.
        id: TicketId,
    },
    /// Return a ticket to the active state.
    Reactivate {
        /// Ticket to reactivate.
        id: TicketId,
    },
}

/// `reservation` actions.
#[derive(Debug, Subcommand)]
enum ReservationCommand {
    /// Book stored tickets for a guest.
    Make {
        /// Guest making the booking.
        guest: GuestId,
        /// Tickets to include.
        tickets: Vec<TicketId>,
        /// Admin in charge, identified by email.
        #[arg(long, requires = "admin_id")]
        admin_email: Option<String>,
        /// Admin in charge, identified by id.
        #[arg(long, requires = "admin_email")]
        admin_id: Option<AdminId>,
    },
    /// List all reservations.
    List,
    /// Print the invoice of a reservation.
    Invoice {
        /// Reservation to print.
        id: ReservationId,
    },
}

/// `payment` actions.
#[derive(Debug, Subcommand)]
enum PaymentCommand {
    /// Pay for a reservation.
    Pay {
        /// Reservation being paid.
        reservation: ReservationId,
        /// Amount paid.
        amount: f64,
        /// Method (credit-card, debit-card, digital-wallet).
        method: PaymentMethod,
    },
    /// Change how a payment was made.
    Method {
        /// Payment to change.
        id: PaymentId,
        /// New method.
        method: PaymentMethod,
    },
    /// Refund part of a payment.
    Refund {
        /// Payment to refund.
        id: PaymentId,
        /// Reservation the refund is issued for.
        reservation: ReservationId,
        /// Amount to refund.
        amount: f64,
    },
    /// Delete a payment.
    Delete {
        /// Payment to delete.
        id: PaymentId,
    },
    /// List all payments.
    List,
}

/// `admin` actions.
#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Create an admin account.
    Add {
        /// Full name.
        name: String,
        /// Email address.
        email: String,
    },
    /// List all admins.
    List,
}

/// `attraction` actions.
#[derive(Debug, Subcommand)]
enum AttractionCommand {
    /// Add an attraction.
    Add {
        /// Attraction name.
        name: String,
        /// Where in the park it is.
        location: String,
        /// Short description.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all attractions.
    List,
    /// Set or clear rider capacity.
    Capacity {
        /// Attraction to change.
        id: AttractionId,
        /// Riders per cycle; omit to clear.
        capacity: Option<u32>,
    },
}

/// `event` actions.
#[derive(Debug, Subcommand)]
enum EventCommand {
    /// Schedule an event.
    Add {
        /// Event name.
        name: String,
        /// Date (YYYY-MM-DD).
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Short description.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all events.
    List,
}

/// `service` actions.
#[derive(Debug, Subcommand)]
enum ServiceCommand {
    /// Add a park service.
    Add {
        /// Service name.
        name: String,
        /// Short description.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all services.
    List,
}

/// Arguments describing a ticket purchase.
#[derive(Debug, Clone, Args)]
struct QuoteArgs {
    /// Ticket type.
    ticket_type: TicketType,
    /// Number of tickets.
    #[arg(long, default_value_t = 1)]
    quantity: u32,
    /// Party size, for group tickets.
    #[arg(long)]
    group_size: Option<u32>,
    /// Age of the child, for child tickets.
    #[arg(long)]
    child_age: Option<u32>,
}

impl QuoteArgs {
    /// Builds the pricing request.
    fn request(&self) -> QuoteRequest {
        let mut request = QuoteRequest::new(self.ticket_type, self.quantity);
        if let Some(size) = self.group_size {
            request = request.group_size(size);
        }
        if let Some(age) = self.child_age {
            request = request.child_age(age);
        }
        request
    }
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Picks the data directory: the flag, then the environment, then the
/// XDG default.
fn resolve_data_dir(data_dir: Option<PathBuf>) -> themepark_rs::error::Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }
    match std::env::var(DATA_DIR_ENV) {
        Ok(val) if !val.is_empty() => Ok(PathBuf::from(val)),
        _ => FileStorage::default_dir(),
    }
}

/// Creates the file storage backend.
fn create_storage(data_dir: Option<PathBuf>) -> themepark_rs::error::Result<FileStorage> {
    FileStorage::new(resolve_data_dir(data_dir)?)
}

/// Prints `message` with the red error prefix.
fn print_error(message: &str, err: &ThemeParkError) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {message}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Renders a successful result with `render`, or prints the error.
fn finish<T, F>(
    result: themepark_rs::error::Result<T>,
    message: &str,
    render: F,
) -> io::Result<ExitCode>
where
    F: FnOnce(T) -> io::Result<()>,
{
    match result {
        Ok(value) => {
            render(value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => print_error(message, &err),
    }
}

/// Prints a one-line confirmation.
fn print_done(message: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{} {message}", "ok:".green().bold())
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => return print_error("failed to initialize storage", &err),
    };

    let mut park = match ThemePark::builder().storage(storage).build() {
        Ok(park) => park,
        Err(err) => return print_error("failed to open park", &err),
    };

    dispatch(&mut park, cli.command)
}

/// Dispatches to the handler of the selected group.
fn dispatch<S: Storage>(park: &mut ThemePark<S>, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Guest(cmd) => cmd_guest(park, cmd),
        Command::Ticket(cmd) => cmd_ticket(park, cmd),
        Command::Reservation(cmd) => cmd_reservation(park, cmd),
        Command::Payment(cmd) => cmd_payment(park, cmd),
        Command::Admin(cmd) => cmd_admin(park, cmd),
        Command::Attraction(cmd) => cmd_attraction(park, cmd),
        Command::Event(cmd) => cmd_event(park, cmd),
        Command::Service(cmd) => cmd_service(park, cmd),
        Command::Sales => {
            print_sales_table(park)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Quote(args) => finish(
            park.quote_tickets(&args.request()),
            "quote failed",
            |quote| print_quote(&quote),
        ),
    }
}

/// Executes a `guest` action.
fn cmd_guest<S: Storage>(park: &mut ThemePark<S>, command: GuestCommand) -> io::Result<ExitCode> {
    match command {
        GuestCommand::Add { name, email, phone } => finish(
            park.add_guest(name, email, phone),
            "failed to add guest",
            |guest| print_guests_table(&[guest]),
        ),
        GuestCommand::List => {
            print_guests_table(park.get_all_guests())?;
            Ok(ExitCode::SUCCESS)
        }
        GuestCommand::Update(args) => {
            let Some(mut guest) = park.guest(args.id).cloned() else {
                return print_error(
                    "failed to update guest",
                    &ThemeParkError::NotFound {
                        category: Category::Guest,
                        id: args.id.into_inner(),
                    },
                );
            };
            if let Some(name) = args.name {
                guest.set_name(name);
            }
            let email_change = args.email.map_or(Ok(()), |email| guest.set_email(email));
            if let Err(err) = email_change {
                return print_error("failed to update guest", &err);
            }
            if let Some(phone) = args.phone {
                guest.set_phone_number(phone);
            }
            if args.age.is_some() {
                guest.set_age(args.age);
            }
            let updated = guest.clone();
            finish(park.update_guest(guest), "failed to update guest", |()| {
                print_guests_table(&[updated])
            })
        }
        GuestCommand::Delete { id } => finish(park.delete_guest(id), "failed to delete guest", |()| {
            print_done(&format!("guest {id} deleted"))
        }),
        GuestCommand::Find { email } => match park.find_guest_by_email(&email) {
            Some(guest) => {
                print_guests_table(core::slice::from_ref(guest))?;
                Ok(ExitCode::SUCCESS)
            }
            None => {
                writeln!(
                    io::stderr().lock(),
                    "{} no guest with email {email}",
                    "error:".red().bold()
                )?;
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

/// Executes a `ticket` action.
fn cmd_ticket<S: Storage>(park: &mut ThemePark<S>, command: TicketCommand) -> io::Result<ExitCode> {
    match command {
        TicketCommand::Sell {
            guest,
            ticket_type,
            price,
            validity,
        } => {
            let defaults = park.discounts().get(ticket_type);
            let unit_price = price.unwrap_or(defaults.price);
            let days = validity.unwrap_or(defaults.validity_period);
            finish(
                park.add_ticket_to_guest(guest, ticket_type, unit_price, days),
                "failed to sell ticket",
                |ticket| print_tickets_table(&[&ticket]),
            )
        }
        TicketCommand::Buy { guest, quote } => finish(
            park.purchase_tickets(guest, &quote.request()),
            "purchase failed",
            |(quote, tickets)| {
                print_quote(&quote)?;
                print_tickets_table(&tickets.iter().collect::<Vec<_>>())
            },
        ),
        TicketCommand::List { guest } => {
            let tickets = match guest {
                Some(id) => park.get_tickets_by_guest(id),
                None => park.get_all_tickets().iter().collect(),
            };
            print_tickets_table(&tickets)?;
            Ok(ExitCode::SUCCESS)
        }
        TicketCommand::Discount {
            ticket_type,
            percent,
        } => finish(
            park.modify_ticket_discount(ticket_type, percent),
            "failed to modify discount",
            |count| print_done(&format!("{count} {ticket_type} ticket(s) now at {percent}%")),
        ),
        TicketCommand::Apply {
            id,
            rule,
            group_size,
        } => finish(
            park.apply_ticket_discount(id, &rule, group_size),
            "failed to apply discount",
            |ticket| print_tickets_table(&[&ticket]),
        ),
        TicketCommand::Validate { id } => {
            finish(park.validate_ticket(id), "failed to validate ticket", |report| {
                writeln!(io::stdout().lock(), "Ticket {id}: {report}")
            })
        }
        TicketCommand::Cancel { id } => finish(park.cancel_ticket(id), "failed to cancel ticket", |()| {
            print_done(&format!("ticket {id} cancelled"))
        }),
        TicketCommand::Redeem { id } => finish(park.redeem_ticket(id), "failed to redeem ticket", |()| {
            print_done(&format!("ticket {id} redeemed"))
        }),
        TicketCommand::Reactivate { id } => finish(
            park.reactivate_ticket(id),
            "failed to reactivate ticket",
            |()| print_done(&format!("ticket {id} active")),
        ),
    }
}

/// Executes a `reservation` action.
fn cmd_reservation<S: Storage>(
    park: &mut ThemePark<S>,
    command: ReservationCommand,
) -> io::Result<ExitCode> {
    match command {
        ReservationCommand::Make {
            guest,
            tickets,
            admin_email,
            admin_id,
        } => {
            let sign_in = admin_email
                .zip(admin_id)
                .map(|(email, id)| park.sign_in_admin(&email, id));
            if let Some(Err(err)) = sign_in {
                return print_error("admin sign-in failed", &err);
            }
            finish(
                park.make_reservation_for_tickets(guest, &tickets),
                "failed to make reservation",
                |reservation| print_reservations_table(&[reservation]),
            )
        }
        ReservationCommand::List => {
            print_reservations_table(park.get_all_reservations())?;
            Ok(ExitCode::SUCCESS)
        }
        ReservationCommand::Invoice { id } => finish(
            park.reservation_invoice(id),
            "failed to render invoice",
            |invoice| write!(io::stdout().lock(), "{invoice}"),
        ),
    }
}

/// Executes a `payment` action.
fn cmd_payment<S: Storage>(park: &mut ThemePark<S>, command: PaymentCommand) -> io::Result<ExitCode> {
    match command {
        PaymentCommand::Pay {
            reservation,
            amount,
            method,
        } => finish(
            park.process_payment(reservation, amount, method),
            "payment failed",
            |payment| print_payments_table(&[payment]),
        ),
        PaymentCommand::Method { id, method } => finish(
            park.update_payment_method(id, method),
            "failed to update payment",
            |payment| print_payments_table(&[payment]),
        ),
        PaymentCommand::Refund {
            id,
            reservation,
            amount,
        } => finish(
            park.refund_payment(id, reservation, amount),
            "refund failed",
            |receipt| print_done(&receipt),
        ),
        PaymentCommand::Delete { id } => finish(
            park.delete_payment(id),
            "failed to delete payment",
            |removed| {
                if removed {
                    print_done(&format!("payment {id} deleted"))
                } else {
                    writeln!(io::stdout().lock(), "{}", "No such payment.".dimmed())
                }
            },
        ),
        PaymentCommand::List => finish(park.get_all_payments(), "failed to read payments", |payments| {
            print_payments_table(&payments)
        }),
    }
}

/// Executes an `admin` action.
fn cmd_admin<S: Storage>(park: &mut ThemePark<S>, command: AdminCommand) -> io::Result<ExitCode> {
    match command {
        AdminCommand::Add { name, email } => finish(
            park.add_admin(name, email),
            "failed to add admin",
            |admin| print_admins_table(&[admin]),
        ),
        AdminCommand::List => finish(park.get_all_admins(), "failed to read admins", |admins| {
            print_admins_table(&admins)
        }),
    }
}

/// Executes an `attraction` action.
fn cmd_attraction<S: Storage>(
    park: &mut ThemePark<S>,
    command: AttractionCommand,
) -> io::Result<ExitCode> {
    match command {
        AttractionCommand::Add {
            name,
            location,
            description,
        } => finish(
            park.add_attraction(name, location, description),
            "failed to add attraction",
            |attraction| print_attractions_table(&[attraction]),
        ),
        AttractionCommand::List => finish(
            park.get_all_attractions(),
            "failed to read attractions",
            |attractions| print_attractions_table(&attractions),
        ),
        AttractionCommand::Capacity { id, capacity } => finish(
            park.update_attraction_capacity(id, capacity),
            "failed to update attraction",
            |attraction| print_attractions_table(&[attraction]),
        ),
    }
}

/// Executes an `event` action.
fn cmd_event<S: Storage>(park: &mut ThemePark<S>, command: EventCommand) -> io::Result<ExitCode> {
    match command {
        EventCommand::Add {
            name,
            date,
            description,
        } => finish(
            park.add_event(name, date, description),
            "failed to add event",
            |event| print_events_table(&[event]),
        ),
        EventCommand::List => finish(park.get_all_events(), "failed to read events", |events| {
            print_events_table(&events)
        }),
    }
}

/// Executes a `service` action.
fn cmd_service<S: Storage>(park: &mut ThemePark<S>, command: ServiceCommand) -> io::Result<ExitCode> {
    match command {
        ServiceCommand::Add { name, description } => finish(
            park.add_service(name, description),
            "failed to add service",
            |service| print_services_table(&[service]),
        ),
        ServiceCommand::List => finish(park.get_all_services(), "failed to read services", |services| {
            print_services_table(&services)
        }),
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Creates a table with the shared preset and a cyan header row.
fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        headers
            .iter()
            .map(|header| Cell::new(header).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Writes a titled table, or `empty` if there are no rows.
fn print_table(title: &str, rows: usize, table: &Table, empty: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows == 0 {
        writeln!(out, "{}", empty.dimmed())?;
        return Ok(());
    }
    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({rows})").dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Formats an optional value, falling back to the empty placeholder.
fn or_empty<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| EMPTY_CELL.to_owned(), |inner| inner.to_string())
}

/// Prints guests in a table.
fn print_guests_table(guests: &[Guest]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Name", "Email", "Phone", "Age", "Tickets"]);
    for guest in guests {
        _ = table.add_row(vec![
            Cell::new(guest.id()),
            Cell::new(guest.name()),
            Cell::new(guest.email()),
            Cell::new(guest.phone_number()),
            Cell::new(or_empty(guest.age())),
            Cell::new(guest.purchase_history().len()),
        ]);
    }
    print_table("Guests", guests.len(), &table, "No guests found.")
}

/// Prints tickets in a table.
fn print_tickets_table(tickets: &[&Ticket]) -> io::Result<()> {
    let mut table = new_table(&[
        "ID", "Type", "Price", "Discount", "Final", "Purchased", "Days", "Status", "Guest",
    ]);
    for ticket in tickets {
        let discount_cell = if ticket.discount() > 0.0_f64 {
            Cell::new(format!("{}%", ticket.discount())).fg(Color::Green)
        } else {
            Cell::new(EMPTY_CELL).fg(Color::DarkGrey)
        };
        _ = table.add_row(vec![
            Cell::new(ticket.id()),
            Cell::new(ticket.ticket_type()),
            Cell::new(format!("{:.2}", ticket.price())),
            discount_cell,
            Cell::new(format!("{:.2}", ticket.calculate_final_price())),
            Cell::new(ticket.purchase_date()),
            Cell::new(ticket.validity_period()),
            Cell::new(ticket.status()),
            Cell::new(or_empty(ticket.guest_id())),
        ]);
    }
    print_table("Tickets", tickets.len(), &table, "No tickets found.")
}

/// Prints reservations in a table.
fn print_reservations_table(reservations: &[Reservation]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Date", "Guest", "Tickets", "Total", "Payment", "Admin"]);
    for reservation in reservations {
        let payment_cell = match reservation.payment() {
            Some(payment) => Cell::new(format!("{:.2}", payment.amount_paid())).fg(Color::Green),
            None => Cell::new("unpaid").fg(Color::Red),
        };
        _ = table.add_row(vec![
            Cell::new(reservation.id()),
            Cell::new(reservation.date()),
            Cell::new(or_empty(reservation.guest().map(Guest::name))),
            Cell::new(reservation.tickets().len()),
            Cell::new(format!("{:.2}", reservation.total_amount())),
            payment_cell,
            Cell::new(or_empty(reservation.admin().map(Admin::name))),
        ]);
    }
    print_table(
        "Reservations",
        reservations.len(),
        &table,
        "No reservations found.",
    )
}

/// Prints payments in a table.
fn print_payments_table(payments: &[Payment]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Amount", "Method", "Date"]);
    for payment in payments {
        _ = table.add_row(vec![
            Cell::new(payment.id()),
            Cell::new(format!("{:.2}", payment.amount_paid())),
            Cell::new(payment.method()),
            Cell::new(payment.date()),
        ]);
    }
    print_table("Payments", payments.len(), &table, "No payments found.")
}

/// Prints admins in a table.
fn print_admins_table(admins: &[Admin]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Name", "Email"]);
    for admin in admins {
        _ = table.add_row(vec![
            Cell::new(admin.id()),
            Cell::new(admin.name()),
            Cell::new(admin.email()),
        ]);
    }
    print_table("Admins", admins.len(), &table, "No admins found.")
}

/// Prints attractions in a table.
fn print_attractions_table(attractions: &[Attraction]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Name", "Location", "Capacity", "Description"]);
    for attraction in attractions {
        _ = table.add_row(vec![
            Cell::new(attraction.id()),
            Cell::new(attraction.name()),
            Cell::new(attraction.location()),
            Cell::new(or_empty(attraction.capacity())),
            Cell::new(attraction.description()),
        ]);
    }
    print_table(
        "Attractions",
        attractions.len(),
        &table,
        "No attractions found.",
    )
}

/// Prints events in a table.
fn print_events_table(events: &[Event]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Name", "Date", "Description"]);
    for event in events {
        _ = table.add_row(vec![
            Cell::new(event.id()),
            Cell::new(event.name()),
            Cell::new(event.date()),
            Cell::new(event.description()),
        ]);
    }
    print_table("Events", events.len(), &table, "No events found.")
}

/// Prints park services in a table.
fn print_services_table(services: &[Service]) -> io::Result<()> {
    let mut table = new_table(&["ID", "Name", "Description"]);
    for service in services {
        _ = table.add_row(vec![
            Cell::new(service.id()),
            Cell::new(service.name()),
            Cell::new(service.description()),
        ]);
    }
    print_table("Services", services.len(), &table, "No services found.")
}

/// Prints ticket sales per purchase date.
fn print_sales_table<S: Storage>(park: &ThemePark<S>) -> io::Result<()> {
    let sales = park.ticket_sales_by_date();
    let mut table = new_table(&["Date", "Tickets Sold"]);
    for (date, count) in &sales {
        _ = table.add_row(vec![Cell::new(date), Cell::new(count).fg(Color::Green)]);
    }
    print_table("Ticket Sales", sales.len(), &table, "No sales yet.")
}

/// Prints a price quote.
fn print_quote(quote: &Quote) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Quote".green().bold())?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Type:".bold(), quote.ticket_type)?;
    writeln!(out, "  {} {:.2}", "Unit price:".bold(), quote.unit_price)?;
    writeln!(out, "  {} {}%", "Discount:".bold(), quote.discount)?;
    writeln!(out, "  {} {}", "Quantity:".bold(), quote.quantity)?;
    writeln!(out, "  {} {:.2}", "Total:".bold(), quote.total)?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr itself failed; nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
