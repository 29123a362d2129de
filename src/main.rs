use perishable_inventory::io::reporting;
use perishable_inventory::model::demand::InterArrival;
use perishable_inventory::model::purchase_order::recurring_orders;
use perishable_inventory::simulation::config::{OptimizerConfig, SimulationConfig};
use perishable_inventory::simulation::metrics::{mean_squared_error, sum_under_target};
use perishable_inventory::strategy::implementations::StockoutPenalty;
use perishable_inventory::strategy::optimization::Optimizer;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ITERATIONS: u64 = 2000;
const AVAILABILITY_TARGET: u32 = 30;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // 1. SETUP CONFIGURATION
    // A year on the shelf, items spoil after 100 days, one customer a day.
    let sim_config = SimulationConfig {
        clearout_interval: Some(7.0),
        sales: Some(InterArrival::daily_uniform()),
        ..SimulationConfig::default()
    };
    let optimizer_config = OptimizerConfig::default();

    // 2. STARTING PLAN
    // 20 items every 30 days.
    let orders = recurring_orders(0, 365, 30, 20);

    // 3. OPTIMIZE
    let mut optimizer = match Optimizer::new(optimizer_config, orders) {
        Ok(optimizer) => optimizer,
        Err(e) => {
            error!("invalid optimizer configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(iterations = ITERATIONS, epsilon = optimizer.epsilon(), "starting optimization");

    let last = match optimizer.run(&sim_config, &StockoutPenalty::default(), ITERATIONS) {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            info!("no iterations requested");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!("optimization aborted: {e}");
            return ExitCode::FAILURE;
        }
    };

    // 4. SUMMARY
    eprintln!("\n=== Final Purchase Plan ===");
    for order in optimizer.orders() {
        eprintln!("day {:>3}: {:>3} items", order.scheduled_day, order.quantity);
    }
    eprintln!("Final reward: {:.1}", last.reward);
    match mean_squared_error(&last.history, AVAILABILITY_TARGET) {
        Ok(mse) => eprintln!("MSE vs target {AVAILABILITY_TARGET}: {mse}"),
        Err(e) => eprintln!("MSE unavailable: {e}"),
    }
    eprintln!(
        "Shortfall vs target {AVAILABILITY_TARGET}: {}",
        sum_under_target(&last.history, AVAILABILITY_TARGET)
    );

    // 5. EXPORT FOR PLOTTING
    let stdout = io::stdout();
    if let Err(e) = reporting::write_availability_csv(stdout.lock(), &last.history, AVAILABILITY_TARGET) {
        error!("failed to write availability CSV: {e}");
        return ExitCode::FAILURE;
    }
    println!();
    if let Err(e) = reporting::write_reward_csv(stdout.lock(), optimizer.rewards()) {
        error!("failed to write reward CSV: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
