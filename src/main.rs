use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use edusphere::config::{ENV_BASE_URL, ENV_CONNECT_TIMEOUT_SECS, ENV_STATE_FILE, ENV_TIMEOUT_SECS};
use edusphere::net::api::Api;
use edusphere::net::types::{
    CourseLevel, CourseQuery, CreateOrderRequest, DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE, LoginRequest, PasswordChange,
    RechargeRequest, RegisterRequest, Role,
};
use edusphere::router::{LOGIN_PATH, Navigator, RouterError};
use edusphere::util::notify::Notifier;
use edusphere::util::persistence::{FileStore, StorageError};
use edusphere::{ApiError, App, ClientConfig, ConfigError, Outcome};
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("http client setup failed: {0}")]
    Transport(#[from] edusphere::net::transport::TransportError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("navigation failed: {0}")]
    Router(#[from] RouterError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected a JSON object for `{0}`")]
    NotAnObject(&'static str),
    #[error("{0}")]
    Rejected(String),
    #[error("not logged in; run `edusphere login` first")]
    NotLoggedIn,
}

#[derive(Parser, Debug)]
#[command(name = "edusphere", about = "EduSphere course platform client")]
struct Cli {
    #[arg(long, env = ENV_BASE_URL)]
    base_url: Option<String>,

    #[arg(long, env = ENV_TIMEOUT_SECS)]
    timeout_secs: Option<String>,

    #[arg(long, env = ENV_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: Option<String>,

    #[arg(long, env = ENV_STATE_FILE)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "EDUSPHERE_PASSWORD")]
        password: String,
        #[arg(long)]
        role: Option<Role>,
    },
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "EDUSPHERE_PASSWORD")]
        password: String,
        #[arg(long, default_value = "student")]
        role: Role,
    },
    Logout,
    /// Re-validate the stored session and print the current profile.
    Whoami,
    /// Resolve a client route through the navigation guard.
    Visit {
        path: String,
    },
    Profile(ProfileCommand),
    Courses(CoursesCommand),
    Categories,
    Cart(CartCommand),
    Orders(OrdersCommand),
    Balance(BalanceCommand),
    Teacher(TeacherCommand),
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Update {
        #[arg(long)]
        data: String,
    },
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
}

#[derive(Args, Debug)]
struct CoursesCommand {
    #[command(subcommand)]
    command: CoursesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CoursesSubcommand {
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        level: Option<CourseLevel>,
        #[arg(long)]
        price_range: Option<String>,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long, default_value_t = DEFAULT_PAGE_NUM)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    Show {
        course_id: i64,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        course_id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        course_id: i64,
    },
    Reviews {
        course_id: i64,
    },
    Review {
        course_id: i64,
        #[arg(long)]
        data: String,
    },
}

#[derive(Args, Debug)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Subcommand, Debug)]
enum CartSubcommand {
    List,
    Add { course_id: i64 },
    Remove { course_id: i64 },
    Clear,
}

#[derive(Args, Debug)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrdersSubcommand {
    List,
    Show {
        order_no: String,
    },
    Create {
        #[arg(required = true)]
        course_ids: Vec<i64>,
    },
    Pay {
        order_no: String,
    },
}

#[derive(Args, Debug)]
struct BalanceCommand {
    #[command(subcommand)]
    command: BalanceSubcommand,
}

#[derive(Subcommand, Debug)]
enum BalanceSubcommand {
    Info,
    Recharge {
        amount: f64,
        #[arg(long)]
        remark: Option<String>,
    },
    Records,
}

#[derive(Args, Debug)]
struct TeacherCommand {
    #[command(subcommand)]
    command: TeacherSubcommand,
}

#[derive(Subcommand, Debug)]
enum TeacherSubcommand {
    Courses,
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        course_id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        course_id: i64,
    },
    Publish {
        course_id: i64,
    },
    Unpublish {
        course_id: i64,
    },
}

/// Failure messages go to stderr; stdout carries only JSON.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

struct StderrNavigator;

impl Navigator for StderrNavigator {
    fn navigate(&self, path: &str) {
        if path == LOGIN_PATH {
            eprintln!("session expired; run `edusphere login` again");
        } else {
            eprintln!("redirected to {path}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env file is the normal case.
    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => eprintln!("warning: failed to load .env: {e}"),
        _ => {}
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let storage = FileStore::open(&config.state_file)?;
    tracing::debug!(state_file = %storage.path().display(), "session storage opened");

    let app = App::new(&config, Arc::new(storage), Arc::new(StderrNotifier), Arc::new(StderrNavigator))?;
    app.start();

    run(&app, cli.command).await
}

fn load_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_lookup(|key| match key {
        ENV_BASE_URL => cli.base_url.clone(),
        ENV_TIMEOUT_SECS => cli.timeout_secs.clone(),
        ENV_CONNECT_TIMEOUT_SECS => cli.connect_timeout_secs.clone(),
        ENV_STATE_FILE => cli
            .state_file
            .as_ref()
            .map(|path| path.display().to_string()),
        _ => None,
    })
}

async fn run(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password, role } => {
            let outcome = app
                .store
                .login(&LoginRequest { username, password, role })
                .await;
            print_outcome(&outcome)
        }
        Command::Register { username, email, password, role } => {
            let outcome = app
                .store
                .register(&RegisterRequest { username, email, password, role })
                .await;
            print_outcome(&outcome)
        }
        Command::Logout => {
            app.store.logout();
            print_json(&json!({ "success": true }))
        }
        Command::Whoami => {
            if !app.store.refresh().await {
                return Err(CliError::NotLoggedIn);
            }
            print_json(&app.session.profile())
        }
        Command::Visit { path } => {
            let entered = app.router.enter(&path, |m| {
                let params: Map<String, Value> = m
                    .params
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                json!({ "route": m.route.name, "path": m.path, "params": params })
            })?;
            let mut view = entered.view;
            if let Some(from) = entered.redirected_from {
                view["redirectedFrom"] = Value::String(from);
            }
            print_json(&view)
        }
        Command::Profile(profile) => run_profile(app, profile).await,
        Command::Courses(courses) => run_courses(&app.api, courses).await,
        Command::Categories => print_json(&app.api.categories().await?),
        Command::Cart(cart) => run_cart(&app.api, cart).await,
        Command::Orders(orders) => run_orders(&app.api, orders).await,
        Command::Balance(balance) => run_balance(&app.api, balance).await,
        Command::Teacher(teacher) => run_teacher(&app.api, teacher).await,
    }
}

async fn run_profile(app: &App, profile: ProfileCommand) -> Result<(), CliError> {
    match profile.command {
        ProfileSubcommand::Update { data } => {
            let fields = parse_object(&data, "data")?;
            let json = app.api.update_profile(&fields).await?;
            let outcome = app.store.update_profile(&fields);
            if let Some(message) = outcome.message() {
                tracing::warn!(%message, "local profile not updated");
            }
            print_json(&json)
        }
        ProfileSubcommand::Password { old, new } => {
            let change = PasswordChange { old_password: old, new_password: new };
            print_json(&app.api.change_password(&change).await?)
        }
    }
}

async fn run_courses(api: &Api, courses: CoursesCommand) -> Result<(), CliError> {
    let json = match courses.command {
        CoursesSubcommand::List { keyword, category, level, price_range, sort_by, page, page_size } => {
            let query = CourseQuery { keyword, category, level, price_range, sort_by, page_num: page, page_size };
            api.list_courses(&query).await?
        }
        CoursesSubcommand::Show { course_id } => api.course(course_id).await?,
        CoursesSubcommand::Create { data } => {
            api.create_course(&serde_json::from_str(&data)?)
                .await?
        }
        CoursesSubcommand::Update { course_id, data } => {
            api.update_course(course_id, &serde_json::from_str(&data)?)
                .await?
        }
        CoursesSubcommand::Delete { course_id } => api.delete_course(course_id).await?,
        CoursesSubcommand::Reviews { course_id } => api.course_reviews(course_id).await?,
        CoursesSubcommand::Review { course_id, data } => {
            api.add_review(course_id, &serde_json::from_str(&data)?)
                .await?
        }
    };
    print_json(&json)
}

async fn run_cart(api: &Api, cart: CartCommand) -> Result<(), CliError> {
    let json = match cart.command {
        CartSubcommand::List => api.cart().await?,
        CartSubcommand::Add { course_id } => api.add_to_cart(course_id).await?,
        CartSubcommand::Remove { course_id } => api.remove_from_cart(course_id).await?,
        CartSubcommand::Clear => api.clear_cart().await?,
    };
    print_json(&json)
}

async fn run_orders(api: &Api, orders: OrdersCommand) -> Result<(), CliError> {
    let json = match orders.command {
        OrdersSubcommand::List => api.orders().await?,
        OrdersSubcommand::Show { order_no } => api.order(&order_no).await?,
        OrdersSubcommand::Create { course_ids } => {
            api.create_order(&CreateOrderRequest { course_ids })
                .await?
        }
        OrdersSubcommand::Pay { order_no } => api.pay_order(&order_no).await?,
    };
    print_json(&json)
}

async fn run_balance(api: &Api, balance: BalanceCommand) -> Result<(), CliError> {
    let json = match balance.command {
        BalanceSubcommand::Info => api.balance().await?,
        BalanceSubcommand::Recharge { amount, remark } => {
            api.recharge(&RechargeRequest { amount, remark })
                .await?
        }
        BalanceSubcommand::Records => api.recharge_records().await?,
    };
    print_json(&json)
}

async fn run_teacher(api: &Api, teacher: TeacherCommand) -> Result<(), CliError> {
    let json = match teacher.command {
        TeacherSubcommand::Courses => api.teacher_courses().await?,
        TeacherSubcommand::Create { data } => {
            api.create_teacher_course(&serde_json::from_str(&data)?)
                .await?
        }
        TeacherSubcommand::Update { course_id, data } => {
            api.update_teacher_course(course_id, &serde_json::from_str(&data)?)
                .await?
        }
        TeacherSubcommand::Delete { course_id } => api.delete_teacher_course(course_id).await?,
        TeacherSubcommand::Publish { course_id } => api.set_course_published(course_id, true).await?,
        TeacherSubcommand::Unpublish { course_id } => api.set_course_published(course_id, false).await?,
    };
    print_json(&json)
}

fn parse_object(raw: &str, field: &'static str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::NotAnObject(field)),
    }
}

fn print_outcome<T: Serialize>(outcome: &Outcome<T>) -> Result<(), CliError> {
    print_json(outcome)?;
    match outcome.message() {
        Some(message) => Err(CliError::Rejected(message.to_owned())),
        None => Ok(()),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
