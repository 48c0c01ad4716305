use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use colored::*;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use tracing::{error, info};

use truckguard::dto::trip_dto::eligible_trucks;
use truckguard::dto::{CreateTruckRequest, LoginRequest, MaintenanceOrderForm, RegisterRequest};
use truckguard::formatters::TripBlockBanner;
use truckguard::models::component::HealthStatus;
use truckguard::models::maintenance::ApprovalStatus;
use truckguard::models::trip::{Trip, TripAction, TripStatus};
use truckguard::models::truck::{Truck, TruckId, TruckStatus};
use truckguard::services::analytics_service::DASHBOARD_TRUCKS;
use truckguard::services::{
    load_truck_detail, AnalyticsService, DateFilter, FleetBackend, MaintenanceBoard, Pager,
    TripBoard, TripFilter, TruckBoard, TruckFilter,
};
use truckguard::{AppError, EnvironmentConfig, FleetApiClient, Session};

/// Operación de flota de TruckGuard desde la terminal
#[derive(Parser)]
#[command(name = "truckguard", version, about)]
struct Cli {
    /// URL base del backend (sobrescribe BACKENDURL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Token de acceso obtenido con `login`
    #[arg(long, global = true, env = "TRUCKGUARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Iniciar sesión e imprimir el token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Registrar un usuario
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
    },
    #[command(subcommand)]
    Trucks(TruckCommand),
    #[command(subcommand)]
    Drivers(DriverCommand),
    #[command(subcommand)]
    Trips(TripCommand),
    #[command(subcommand)]
    Components(ComponentCommand),
    #[command(subcommand)]
    Maintenance(MaintenanceCommand),
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    per_page: Option<u32>,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    status: Option<String>,
}

#[derive(Subcommand)]
enum TruckCommand {
    List(PageArgs),
    Show { truck_id: TruckId },
    Create {
        #[arg(long)]
        plate: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        color: String,
        #[arg(long, default_value_t = 0.0)]
        mileage: f64,
    },
    /// Cambiar estado: Activo, Mantenimiento o Inactivo
    Status { truck_id: TruckId, status: String },
    Assign { truck_id: TruckId, driver_id: i64 },
    Unassign { truck_id: TruckId },
}

#[derive(Subcommand)]
enum DriverCommand {
    /// Conductores sin camión asignado
    Available {
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[derive(Subcommand)]
enum TripCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// all, today, yesterday, lastWeek o lastMonth
        #[arg(long, default_value = "all")]
        date: String,
    },
    Show { trip_id: i64 },
    /// Camiones que pueden tomar un viaje (con conductor asignado)
    Trucks,
    Create {
        #[arg(long)]
        truck: TruckId,
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        /// Fecha YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    Activate { trip_id: i64 },
    Complete { trip_id: i64 },
    Delete { trip_id: i64 },
}

#[derive(Subcommand)]
enum ComponentCommand {
    Status { truck_id: TruckId },
    Bulk { truck_ids: Vec<TruckId> },
}

#[derive(Subcommand)]
enum MaintenanceCommand {
    History { truck_id: TruckId },
    Pending,
    Approve { maintenance_id: i64 },
    Reject { maintenance_id: i64 },
    /// Crear orden de mantenimiento para un componente del camión
    Create {
        #[arg(long)]
        truck: TruckId,
        #[arg(long)]
        component: String,
        #[arg(long)]
        cost: Decimal,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        interval: Option<i64>,
    },
}

#[derive(Subcommand)]
enum AnalyticsCommand {
    Show,
    Refresh,
    /// Dashboard: analytics + KPIs
    Overview,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let cli = Cli::parse();

    let mut vars: HashMap<String, String> = std::env::vars().collect();
    if let Some(url) = &cli.backend_url {
        vars.insert("BACKENDURL".to_string(), url.clone());
    }
    let config = EnvironmentConfig::from_vars(&vars).context("configuración inválida")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .init();

    info!("🚚 TruckGuard - Cliente de flota");
    info!("🌐 Backend: {}", config.backend_url);
    info!("🔧 Entorno: {}", config.environment);

    let mut client = FleetApiClient::new(&config)?;
    if let Some(token) = &cli.token {
        client = client.with_session(Session::from_token(token.clone()));
    }

    if let Err(e) = run(cli.command, client, &config).await {
        error!("❌ {}", e);
        eprintln!("{} {}", "❌".bright_red(), e.user_message().bright_red());
        return Err(anyhow!(e));
    }
    Ok(())
}

async fn run(command: Command, client: FleetApiClient, config: &EnvironmentConfig) -> Result<(), AppError> {
    match command {
        Command::Login { email, password } => {
            let session = client.login(&LoginRequest { email, password }).await?;
            if let Some(user) = &session.user {
                println!("{} {} {}", "🔐 Bienvenido".bright_green().bold(), user.name, user.surname);
            }
            if let Some(expires_at) = session.expires_at {
                println!("{} {}", "Expira:".dimmed(), expires_at);
            }
            println!("{}", "export TRUCKGUARD_TOKEN=...".dimmed());
            println!("{}", session.token);
        }
        Command::Register { name, surname, email, password, phone } => {
            let response = client
                .register(&RegisterRequest { name, surname, email, password, phone })
                .await?;
            println!("{}", "✅ Usuario registrado".bright_green().bold());
            print_json(&response);
        }
        Command::Trucks(command) => run_trucks(command, Arc::new(client), config).await?,
        Command::Drivers(DriverCommand::Available { search }) => {
            let mut board = TruckBoard::new(Arc::new(client), DASHBOARD_TRUCKS);
            board.load().await?;
            println!(
                "{} {}  {} {}",
                "👤 Conductores disponibles:".bright_cyan().bold(),
                board.available_drivers().len(),
                "🚚 Camiones sin conductor:".bright_cyan().bold(),
                board.trucks_without_driver().len()
            );
            for driver in board.search_drivers(&search) {
                println!("  #{:<5} {:<30} {:<30} {}", driver.id, driver.full_name(), driver.email, driver.phone);
            }
        }
        Command::Trips(command) => run_trips(command, Arc::new(client), config).await?,
        Command::Components(ComponentCommand::Status { truck_id }) => {
            let report = client.component_status(truck_id).await?;
            println!(
                "{} {} ({})",
                "🔩 Componentes del camión".bright_cyan().bold(),
                report.plate,
                paint_health(&report.overall_health_status)
            );
            for component in &report.components {
                println!(
                    "  {:<14} {:<22} {:>6.1}%  faltan {:>8.0} km",
                    component.component_name,
                    paint_health(&component.current_status),
                    component.health_percentage,
                    component.km_remaining
                );
            }
            let needing: Vec<&str> = report
                .components_needing_maintenance()
                .iter()
                .map(|c| c.component_name.as_str())
                .collect();
            if !needing.is_empty() {
                println!("{} {}", "⚠️ Requieren mantenimiento:".bright_red().bold(), needing.join(", "));
            }
        }
        Command::Components(ComponentCommand::Bulk { truck_ids }) => {
            let response = client.bulk_component_status(&truck_ids).await?;
            println!(
                "{} {}/{} camiones ({:.0} ms)",
                "🔩 Estado bulk:".bright_cyan().bold(),
                response.total_successful,
                response.total_requested,
                response.processing_time_ms
            );
            for report in &response.successful_trucks {
                println!(
                    "  #{:<5} {:<10} {:<22} {} en mantenimiento",
                    report.truck_id,
                    report.plate,
                    paint_health(&report.overall_health_status),
                    report.components_requiring_maintenance
                );
            }
            for failed in &response.failed_trucks {
                println!("  #{:<5} {}", failed.truck_id, failed.error.bright_red());
            }
        }
        Command::Maintenance(command) => run_maintenance(command, Arc::new(client)).await?,
        Command::Analytics(command) => {
            let service = AnalyticsService::new(&client);
            match command {
                AnalyticsCommand::Show => print_json(&service.analytics().await?),
                AnalyticsCommand::Refresh => print_json(&service.refresh().await?),
                AnalyticsCommand::Overview => {
                    let overview = service.overview().await?;
                    println!("{}", "📊 DASHBOARD".bright_blue().bold());
                    println!("{}", "============".bright_blue());
                    println!("Camiones:                {}", overview.kpis.total_trucks);
                    println!("Con conductor:           {}", overview.kpis.trucks_with_driver);
                    println!("Sin conductor:           {}", overview.kpis.trucks_without_driver);
                    println!("Componentes:             {}", overview.kpis.total_components);
                    println!("Conductores disponibles: {}", overview.available_drivers);
                    print_json(&overview.analytics);
                }
            }
        }
    }
    Ok(())
}

async fn run_trucks(
    command: TruckCommand,
    client: Arc<FleetApiClient>,
    config: &EnvironmentConfig,
) -> Result<(), AppError> {
    let mut board = TruckBoard::new(client.clone(), config.default_page_size);

    match command {
        TruckCommand::List(args) => {
            if let Some(per_page) = args.per_page {
                board.set_per_page(per_page).await?;
            } else {
                board.load().await?;
            }
            board.set_page(args.page).await?;
            board.filter = TruckFilter {
                search: args.search,
                status: args.status.map(TruckStatus::from),
            };

            let pager = board.pager();
            println!(
                "{} página {} de {} | {} en esta página",
                "🚚 Camiones:".bright_cyan().bold(),
                pager.page(),
                pager.pages(),
                board.visible_trucks().len()
            );
            for truck in board.visible_trucks() {
                print_truck_row(truck);
            }
            print_page_window(board.pager());
        }
        TruckCommand::Show { truck_id } => {
            let detail = load_truck_detail(client.as_ref(), truck_id).await?;
            let truck = &detail.truck;
            println!("{} {}", "🚚 Camión".bright_cyan().bold(), truck.plate.bold());
            println!("  {} {} {} ({})", truck.brand, truck.model, truck.year, truck.color);
            println!("  Estado: {}  Kilometraje: {:.0} km", paint_truck_status(&truck.status), truck.mileage);
            println!("  Conductor: {}", detail.driver_name);
            println!("  Salud general: {}", detail.health_score);
            println!("{}", "  Componentes:".bright_blue());
            for point in &detail.radar {
                println!("    {:<12} {:>5.1}", point.label, point.value);
            }
            println!("{}", "  Historial de mantenimiento:".bright_blue());
            for entry in &detail.history {
                println!(
                    "    #{:<5} {:<40} {:?} ${}",
                    entry.id, entry.title, entry.status, entry.cost
                );
            }
        }
        TruckCommand::Create { plate, brand, model, year, color, mileage } => {
            let request = CreateTruckRequest {
                plate,
                model,
                brand,
                year,
                color,
                mileage,
                health_status: HealthStatus::Good,
                status: TruckStatus::Active,
                fleetanalytics_id: None,
                components: Vec::new(),
            };
            match board.create_truck(&request).await? {
                Some(truck_id) => println!("{} #{}", "✅ Camión creado".bright_green().bold(), truck_id),
                None => println!("{}", "✅ Camión creado".bright_green().bold()),
            }
        }
        TruckCommand::Status { truck_id, status } => {
            let status = TruckStatus::from(status);
            if let TruckStatus::Other(label) = &status {
                let valid: Vec<&str> = TruckStatus::ALL.iter().map(|s| s.label()).collect();
                return Err(AppError::Forbidden(format!(
                    "estado '{}' desconocido, usar: {}",
                    label,
                    valid.join(", ")
                )));
            }
            board.load_single(truck_id).await?;
            board.update_status(truck_id, status).await?;
            if let Some(truck) = board.truck(truck_id) {
                print_truck_row(truck);
            }
        }
        TruckCommand::Assign { truck_id, driver_id } => {
            board.load_single(truck_id).await?;
            board.assign_driver(truck_id, driver_id).await?;
            if let Some(truck) = board.truck(truck_id) {
                print_truck_row(truck);
            }
        }
        TruckCommand::Unassign { truck_id } => {
            board.load_single(truck_id).await?;
            board.unassign_driver(truck_id).await?;
            if let Some(truck) = board.truck(truck_id) {
                print_truck_row(truck);
            }
        }
    }
    Ok(())
}

async fn run_trips(
    command: TripCommand,
    client: Arc<FleetApiClient>,
    config: &EnvironmentConfig,
) -> Result<(), AppError> {
    let mut board = TripBoard::new(client.clone(), config.default_page_size, config.trips_delete_enabled);
    let today = Local::now().date_naive();

    match command {
        TripCommand::List { page, date } => {
            if let Some(per_page) = page.per_page {
                board.set_per_page(per_page).await?;
            } else {
                board.load().await?;
            }
            board.set_page(page.page).await?;
            board.filter = TripFilter {
                search: page.search,
                status: page.status.map(TripStatus::from),
                date: DateFilter::parse(&date).unwrap_or_default(),
            };

            let pager = board.pager();
            println!(
                "{} Total de viajes: {} | Página {} de {} | {} viajes en esta página",
                "🧭".bright_cyan(),
                board.server_total(),
                pager.page(),
                pager.pages(),
                board.filtered_count(today)
            );
            for trip in board.visible_trips(today) {
                print_trip_row(trip, &board.actions_for(trip));
            }
            print_page_window(board.pager());
        }
        TripCommand::Trucks => {
            let mut trucks = TruckBoard::new(client.clone(), DASHBOARD_TRUCKS);
            trucks.load().await?;
            let eligible = eligible_trucks(trucks.trucks());
            println!("{} {}", "🚚 Camiones con conductor:".bright_cyan().bold(), eligible.len());
            for truck in eligible {
                print_truck_row(truck);
            }
        }
        TripCommand::Show { trip_id } => {
            board.load_single(trip_id).await?;
            if let Some(trip) = board.trip(trip_id) {
                print_trip_row(trip, &board.actions_for(trip));
                println!("  Conductor: {} {} {}", trip.driver.name, trip.driver.surname, trip.driver.phone);
                println!("  Camión: {} {} {}", trip.truck.plate, trip.truck.brand, trip.truck.model);
            }
        }
        TripCommand::Create { truck, origin, destination, date } => {
            let truck = client.get_truck(truck).await?;
            match board.create_trip(&truck, &origin, &destination, &date).await {
                Ok(_) => {
                    if let Some(created) = board.take_created() {
                        println!("{}", "✅ Viaje creado".bright_green().bold());
                        println!("  {} → {} ({})", created.origin, created.destination, created.status);
                        println!("  Conductor: {}", created.driver_name);
                        println!("  Camión: {} {} {}", created.truck_brand, created.truck_model, created.truck_plate);
                    }
                }
                Err(e @ AppError::Validation(_)) => return Err(e),
                Err(e) => {
                    println!("{}", TripBlockBanner::from_error(&e).render());
                    return Err(e);
                }
            }
        }
        TripCommand::Activate { trip_id } => trip_action(&mut board, trip_id, TripAction::Activate).await?,
        TripCommand::Complete { trip_id } => trip_action(&mut board, trip_id, TripAction::Complete).await?,
        TripCommand::Delete { trip_id } => trip_action(&mut board, trip_id, TripAction::Delete).await?,
    }
    Ok(())
}

async fn trip_action<B: FleetBackend>(board: &mut TripBoard<B>, trip_id: i64, action: TripAction) -> Result<(), AppError> {
    board.load_single(trip_id).await?;
    board.perform(trip_id, action).await?;
    println!("{} {} #{}", "✅".bright_green(), action.label(), trip_id);
    Ok(())
}

async fn run_maintenance(command: MaintenanceCommand, client: Arc<FleetApiClient>) -> Result<(), AppError> {
    let mut board = MaintenanceBoard::new(client.clone());

    match command {
        MaintenanceCommand::History { truck_id } => {
            let history = client.maintenance_history(truck_id).await?;
            println!("{} {}", "🔧 Mantenimientos:".bright_cyan().bold(), history.len());
            for record in &history {
                println!(
                    "  #{:<5} {:<12} {:<30} {:<22} ${}",
                    record.maintenance_id,
                    record.component,
                    record.description,
                    paint_health(&record.status),
                    record.cost
                );
            }
        }
        MaintenanceCommand::Pending => {
            board.load_pending().await?;
            println!(
                "{} {} (total ${})",
                "🔧 Pendientes de aprobación:".bright_cyan().bold(),
                board.pending().len(),
                board.pending_cost()
            );
            for record in board.pending() {
                println!(
                    "  #{:<5} {:<10} {:<12} {:<30} ${}",
                    record.maintenance_id, record.truck.plate, record.component, record.description, record.cost
                );
            }
        }
        MaintenanceCommand::Approve { maintenance_id } => {
            board.load_pending().await?;
            board.review(maintenance_id, ApprovalStatus::Approved).await?;
            println!("{} #{}", "✅ Aprobado".bright_green().bold(), maintenance_id);
        }
        MaintenanceCommand::Reject { maintenance_id } => {
            board.load_pending().await?;
            board.review(maintenance_id, ApprovalStatus::Rejected).await?;
            println!("{} #{}", "🚫 Rechazado".bright_yellow().bold(), maintenance_id);
        }
        MaintenanceCommand::Create { truck, component, cost, description, interval } => {
            let (truck, report) = futures::try_join!(client.get_truck(truck), client.component_status(truck))?;
            let status = report
                .components
                .iter()
                .find(|c| c.component_name.eq_ignore_ascii_case(&component))
                .ok_or_else(|| AppError::NotFound(format!("component '{}'", component)))?;

            let mut form = MaintenanceOrderForm::for_component(&truck, status);
            form.cost = Some(cost);
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(interval) = interval {
                form.mileage_interval = interval;
            }

            let response = board.create_order(form).await?;
            println!("{}", "✅ Orden de mantenimiento creada".bright_green().bold());
            if let Some(message) = response.message {
                println!("  {}", message);
            }
        }
    }
    Ok(())
}

fn print_truck_row(truck: &Truck) {
    println!(
        "  #{:<5} {:<10} {:<10} {:<10} {:<6} {:<16} {}",
        truck.truck_id,
        truck.plate,
        truck.brand,
        truck.model,
        truck.year,
        paint_truck_status(&truck.status),
        truck.driver_display_name()
    );
}

fn print_trip_row(trip: &Trip, actions: &[TripAction]) {
    let actions: Vec<&str> = actions.iter().map(|a| a.label()).collect();
    println!(
        "  #{:<5} {:<18} → {:<18} {:<12} {:<12} {:<10} [{}]",
        trip.trip_id,
        trip.origin,
        trip.destination,
        trip.date,
        paint_trip_status(&trip.status),
        trip.truck.plate,
        actions.join(", ")
    );
}

fn print_page_window(pager: &Pager) {
    if pager.pages() <= 1 {
        return;
    }
    let window: Vec<String> = pager
        .page_window()
        .into_iter()
        .map(|page| {
            if page == pager.page() {
                format!("[{}]", page).as_str().bold().to_string()
            } else {
                page.to_string()
            }
        })
        .collect();
    println!("  {} {}", "Páginas:".dimmed(), window.join(" "));
}

fn paint_truck_status(status: &TruckStatus) -> ColoredString {
    match status {
        TruckStatus::Active => status.label().bright_green(),
        TruckStatus::Maintenance => status.label().bright_yellow(),
        TruckStatus::Inactive => status.label().bright_red(),
        TruckStatus::Other(label) => label.normal(),
    }
}

fn paint_trip_status(status: &TripStatus) -> ColoredString {
    match status {
        TripStatus::Pending => status.label().bright_yellow(),
        TripStatus::Active => status.label().bright_blue(),
        TripStatus::Completed => status.label().bright_green(),
        TripStatus::Other(label) => label.normal(),
    }
}

fn paint_health(status: &HealthStatus) -> ColoredString {
    match status {
        HealthStatus::Excellent | HealthStatus::VeryGood | HealthStatus::Good => status.as_str().bright_green(),
        HealthStatus::Fair => status.as_str().bright_yellow(),
        _ => status.as_str().bright_red(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("❌ No se pudo serializar la respuesta: {}", e),
    }
}
