//! `fleet` command-line entry point.
//!
//! Each subcommand parses primitive ids/fields, calls one facade operation
//! and prints the result as JSON. It plays the part of the request handlers
//! in front of the persistence core.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fleet_core::{
    authenticate, init_logging, Car, DatabaseTarget, FleetConfig, FleetContext, NewCar, NewDriver,
    NewManufacturer,
};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fleet", version, about = "Manage manufacturers, cars and drivers")]
struct Cli {
    /// SQLite database file. Without it every command runs against a fresh
    /// in-memory database that is discarded when the command exits
    #[arg(long, global = true, env = "FLEET_DB")]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "FLEET_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long, global = true, env = "FLEET_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manufacturer operations
    #[command(subcommand)]
    Manufacturer(ManufacturerCommand),
    /// Driver operations
    #[command(subcommand)]
    Driver(DriverCommand),
    /// Car operations and driver assignment
    #[command(subcommand)]
    Car(CarCommand),
    /// Check a driver's login and password
    Login {
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum ManufacturerCommand {
    Add(ManufacturerFields),
    List,
    Get { id: i64 },
    Update {
        id: i64,
        #[command(flatten)]
        fields: ManufacturerFields,
    },
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct ManufacturerFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    country: String,
}

#[derive(Subcommand, Debug)]
enum DriverCommand {
    /// Register a driver
    Add(DriverFields),
    List,
    Get { id: i64 },
    Update {
        id: i64,
        #[command(flatten)]
        fields: DriverFields,
    },
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct DriverFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    license_number: String,
    #[arg(long)]
    login: String,
    #[arg(long)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum CarCommand {
    Add {
        #[arg(long)]
        model: String,
        #[arg(long)]
        manufacturer: i64,
        /// Driver ids to assign; repeatable
        #[arg(long = "driver")]
        drivers: Vec<i64>,
    },
    /// List cars, or only the cars currently assigned to one driver
    List {
        #[arg(long)]
        driver: Option<i64>,
    },
    Get { id: i64 },
    Update {
        id: i64,
        #[arg(long)]
        model: String,
        #[arg(long)]
        manufacturer: i64,
    },
    Delete { id: i64 },
    Assign {
        #[arg(long)]
        car: i64,
        #[arg(long)]
        driver: i64,
    },
    Unassign {
        #[arg(long)]
        car: i64,
        #[arg(long)]
        driver: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = FleetConfig {
        database: cli.db.map_or(DatabaseTarget::Memory, DatabaseTarget::File),
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    };
    init_logging(&config.log_level, config.log_dir.as_deref())
        .context("failed to initialize logging")?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        fleet_core::core_version()
    );

    let ctx = FleetContext::open(&config).context("failed to open fleet database")?;
    match cli.command {
        Command::Manufacturer(command) => manufacturer(&ctx, command),
        Command::Driver(command) => driver(&ctx, command),
        Command::Car(command) => car(&ctx, command),
        Command::Login { login, password } => {
            print_json(&authenticate(&ctx.drivers, &login, &password)?)
        }
    }
}

fn manufacturer(ctx: &FleetContext, command: ManufacturerCommand) -> Result<()> {
    let service = &ctx.manufacturers;
    match command {
        ManufacturerCommand::Add(fields) => print_json(
            &service.create(NewManufacturer::new(fields.name, fields.country))?,
        ),
        ManufacturerCommand::List => print_json(&service.get_all()?),
        ManufacturerCommand::Get { id } => print_json(&service.get(id)?),
        ManufacturerCommand::Update { id, fields } => {
            let mut manufacturer = service.get(id)?;
            manufacturer.name = fields.name;
            manufacturer.country = fields.country;
            print_json(&service.update(&manufacturer)?)
        }
        ManufacturerCommand::Delete { id } => print_deleted(id, service.delete(id)?),
    }
}

fn driver(ctx: &FleetContext, command: DriverCommand) -> Result<()> {
    let service = &ctx.drivers;
    match command {
        DriverCommand::Add(fields) => print_json(&service.create(NewDriver::new(
            fields.name,
            fields.license_number,
            fields.login,
            fields.password,
        ))?),
        DriverCommand::List => print_json(&service.get_all()?),
        DriverCommand::Get { id } => print_json(&service.get(id)?),
        DriverCommand::Update { id, fields } => {
            let mut driver = service.get(id)?;
            driver.name = fields.name;
            driver.license_number = fields.license_number;
            driver.login = fields.login;
            driver.password = fields.password;
            print_json(&service.update(&driver)?)
        }
        DriverCommand::Delete { id } => print_deleted(id, service.delete(id)?),
    }
}

fn car(ctx: &FleetContext, command: CarCommand) -> Result<()> {
    let service = &ctx.cars;
    match command {
        CarCommand::Add {
            model,
            manufacturer,
            drivers,
        } => {
            let mut draft = NewCar::new(model, ctx.manufacturers.get(manufacturer)?);
            for driver_id in drivers {
                draft.drivers.push(ctx.drivers.get(driver_id)?);
            }
            print_json(&service.create(draft)?)
        }
        CarCommand::List { driver: None } => print_json(&service.get_all()?),
        CarCommand::List {
            driver: Some(driver_id),
        } => print_json(&service.get_all_by_driver(driver_id)?),
        CarCommand::Get { id } => print_json(&service.get(id)?),
        CarCommand::Update {
            id,
            model,
            manufacturer,
        } => {
            let mut car = service.get(id)?;
            car.model = model;
            car.manufacturer = ctx.manufacturers.get(manufacturer)?;
            print_json(&service.update(&car)?)
        }
        CarCommand::Delete { id } => print_deleted(id, service.delete(id)?),
        CarCommand::Assign { car, driver } => {
            let driver = ctx.drivers.get(driver)?;
            let mut car: Car = service.get(car)?;
            service.assign_driver(&driver, &mut car)?;
            print_json(&car)
        }
        CarCommand::Unassign { car, driver } => {
            let driver = ctx.drivers.get(driver)?;
            let mut car: Car = service.get(car)?;
            service.unassign_driver(&driver, &mut car)?;
            print_json(&car)
        }
    }
}

#[derive(Serialize)]
struct Deleted {
    id: i64,
    deleted: bool,
}

fn print_deleted(id: i64, deleted: bool) -> Result<()> {
    print_json(&Deleted { id, deleted })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
