//! pharma-dash - warehouse dashboard on the command line

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pharma_client::catalog::{parse_json_rows, parse_workbook};
use pharma_client::orders::format_order_date;
use pharma_client::{
    AppContext, ClientConfig, InvoiceRenderer, OrderStatus, PharmaApi, Session,
    TextInvoiceRenderer, init_logger_with_file, login, print_invoice,
};
use pharma_printer::{NetworkPrinter, Printer};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "pharma-dash", version, about = "Pharma At Once warehouse dashboard")]
struct Cli {
    /// Session file written by `login`
    #[arg(long, env = "PHARMA_SESSION", default_value = "session.json", global = true)]
    session: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PHARMA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the warehouse profile
    Profile,
    #[command(subcommand)]
    Orders(OrdersCommand),
    #[command(subcommand)]
    Medicines(MedicinesCommand),
    /// Render or print the invoice of an order
    Invoice {
        order_id: i64,
        /// Directory for the text invoice
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Receipt printer, `host[:port]`
        #[arg(long)]
        printer: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum OrdersCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    Show {
        id: i64,
    },
    /// Move an order to a new status (Preparing, Delivering, Delivered, Cancelled)
    Advance {
        id: i64,
        status: String,
    },
}

#[derive(Debug, Subcommand)]
enum MedicinesCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
        /// 0 = cosmetic, 1 = pharmaceutical
        #[arg(long)]
        drug: Option<i32>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        quantity: i64,
        #[arg(long)]
        discount: f64,
    },
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Import a spreadsheet (.xlsx, .xls, .ods) or a JSON row export
    Import {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    match cli.command {
        Command::Login { email, password } => {
            let api = PharmaApi::from_config(&config)?;
            let session = login(&api, &email, &password).await?;
            session.save(&cli.session)?;
            println!(
                "Signed in to warehouse {} ({})",
                session.warehouse_id(),
                cli.session.display()
            );
        }
        command => {
            let session = load_session(&cli.session)?;
            let ctx = AppContext::connect(config, session)?;
            run(&ctx, command).await?;
        }
    }
    Ok(())
}

fn load_session(path: &Path) -> Result<Session> {
    Session::load(path)
        .or_else(|_| Session::from_env())
        .with_context(|| format!("no session in {} and none in the environment; run `login` first", path.display()))
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login { .. } => bail!("already signed in"),
        Command::Profile => {
            let w = ctx.api.warehouse(&ctx.session).await?;
            println!("{} (#{})", w.name, w.id);
            println!("  email:    {}", w.email);
            println!("  phone:    {}", w.phone);
            println!("  address:  {}, {}", w.address, w.governate);
            println!("  trusted:  {}", if w.is_trusted { "yes" } else { "no" });
            for area in &w.areas {
                println!("  area:     {} (min {:.2})", area.area_name, area.minimum_price);
            }
        }
        Command::Orders(cmd) => orders(ctx, cmd).await?,
        Command::Medicines(cmd) => medicines(ctx, cmd).await?,
        Command::Invoice { order_id, out, printer } => {
            let detail = ctx.order_detail();
            detail.load(order_id).await?;
            let invoice = detail.load_invoice().await?;

            let renderer = TextInvoiceRenderer::default();
            let path = out.join(invoice.file_name(renderer.extension()));
            std::fs::write(&path, renderer.render(&invoice))
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Invoice written to {}", path.display());

            if let Some(addr) = printer {
                let printer = NetworkPrinter::from_addr(&addr)?;
                if !printer.is_online().await {
                    bail!("printer {} is not reachable", printer.addr());
                }
                print_invoice(&invoice, &printer).await?;
                println!("Invoice sent to {}", printer.addr());
            }
        }
    }
    Ok(())
}

async fn orders(ctx: &AppContext, cmd: OrdersCommand) -> Result<()> {
    match cmd {
        OrdersCommand::List { page, page_size } => {
            let mut ctx = ctx.clone();
            if let Some(size) = page_size {
                ctx.config = ctx.config.with_page_size(size);
            }
            let board = ctx.order_board();
            board.load_all().await?;
            if !board.go_to(page) && !board.is_empty() {
                bail!("page {page} out of range 1..={}", board.total_pages());
            }
            for o in board.page() {
                println!(
                    "#{:<6} {:<12} {:<24} {:>10.2}  {}",
                    o.order_id,
                    o.status.label_ar(),
                    o.pharmacy_name,
                    o.total_price,
                    format_order_date(o.order_date.as_deref())
                );
            }
            println!(
                "page {}/{} ({} orders)",
                board.current_page(),
                board.total_pages(),
                board.len()
            );
        }
        OrdersCommand::Show { id } => {
            let detail = ctx.order_detail();
            let o = detail.load(id).await?;
            println!("Order #{} - {} ({})", o.order_id, o.status, o.status.label_ar());
            println!("  pharmacy: {}", o.pharmacy_name);
            println!("  date:     {}", format_order_date(o.order_date.as_deref()));
            println!("  total:    {:.2} ({} items)", o.total_price, o.quantity);
            for item in &o.medicines {
                println!(
                    "  - {} x{} @ {:.2}",
                    item.medicine_name.as_deref().unwrap_or("?"),
                    item.quantity,
                    item.price
                );
            }
            let next: Vec<String> = detail
                .allowed_transitions()
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("  next:     {}", if next.is_empty() { "-".into() } else { next.join(", ") });
        }
        OrdersCommand::Advance { id, status } => {
            let status: OrderStatus = status.parse()?;

            // The board follows bus events the way the list view does
            let board = ctx.order_board();
            let _subscription = board.attach(&ctx.bus);
            board.load_all().await?;

            let detail = ctx.order_detail();
            detail.load(id).await?;
            let order = detail.update_status(status).await?;
            println!("Order #{} is now {} ({})", order.order_id, order.status, order.status.label_ar());

            for (order_id, outcome) in board.process_notifications().await {
                tracing::debug!(order_id, ?outcome, "Board refreshed");
            }
        }
    }
    Ok(())
}

async fn medicines(ctx: &AppContext, cmd: MedicinesCommand) -> Result<()> {
    let mut catalog = ctx.catalog();
    match cmd {
        MedicinesCommand::List { page, search, drug } => {
            catalog.load_page(page).await?;
            catalog.set_search(search);
            catalog.set_drug_filter(drug);
            for m in catalog.displayed() {
                println!(
                    "{:<8} {:<28} {:<20} q={:<5} {:>8.2} -{:>5.1}% = {:>8.2}",
                    m.medicine_id,
                    m.english_medicine_name.as_deref().unwrap_or("-"),
                    m.arabic_medicine_name.as_deref().unwrap_or("-"),
                    m.quantity,
                    m.price,
                    m.discount,
                    m.final_price
                );
            }
            println!(
                "page {}/{} ({} medicines)",
                catalog.page(),
                catalog.total_pages(),
                catalog.total_count()
            );
        }
        MedicinesCommand::Edit { id, quantity, discount } => {
            catalog.refresh_trust().await;
            let before = catalog.fetch_detail(id).await?;
            let message = catalog.edit(id, quantity, discount).await?;
            println!(
                "Medicine {id}: quantity {} -> {quantity}, discount {:.1} -> {discount:.1}",
                before.quantity,
                before.effective_discount()
            );
            if !message.is_empty() {
                println!("{message}");
            }
        }
        MedicinesCommand::Delete { id, yes } => {
            if !catalog.refresh_trust().await {
                bail!("warehouse is not trusted; medicines cannot be deleted");
            }
            if !yes {
                bail!("pass --yes to delete medicine {id}");
            }
            catalog.delete(id).await?;
            println!("Medicine {id} deleted");
        }
        MedicinesCommand::Import { file, json } => {
            let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let rows = if json {
                parse_json_rows(&bytes)?
            } else {
                parse_workbook(&bytes)?
            };

            catalog.load_page(1).await?;
            let report = catalog.import_rows(rows).await?;

            for w in &report.warnings {
                println!("warning [{}]: {w}", w.code());
            }
            if !report.dropped.is_empty() {
                println!("skipped (lookup failed): {:?}", report.dropped);
            }
            if let Some(w) = &report.submit_warning {
                println!("warning: server did not accept the update ({w})");
            }
            if !report.changed {
                println!("note: file contains no changes");
            }
            println!(
                "Imported {} medicines ({} updated, {} new)",
                report.accepted.len(),
                report.updated,
                report.appended
            );

            // Re-read so the listing reflects the server
            catalog.load_page(1).await?;
            println!("catalog now holds {} medicines", catalog.total_count());
        }
    }
    Ok(())
}
