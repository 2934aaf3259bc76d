mod io;
mod market;
mod model;
mod simulation;

use crate::io::reporting;
use crate::market::recipes::RecipeBook;
use crate::simulation::config::{MarketScenario, SimulationConfig, SupplySchedule};
use crate::simulation::engine::ReactorSimulation;
use log::error;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    println!("=== Reactor Fuel-Cycle Simulation ===");

    // 1. SETUP CONFIGURATION
    let mut config = SimulationConfig::default();
    let reactor = &config.reactor;
    println!(
        "Reactor: {} kg batches of '{}', {}-step cycle, contract lead time {}",
        reactor.fuel_mass, reactor.recipe_id, reactor.cycle_length, reactor.request_lead_time
    );

    // 2. DEFINE THE MARKET
    // Pick a scenario with the first argument:
    //   reliable       - every spot request is filled
    //   constant       - scheduled market with no outages
    //   outage-window  - the supplier goes dark for a few steps mid-run
    //   random         - each request is filled with 90% probability
    //   (default)      - scheduled market with random outages
    let scenario = env::args().nth(1).unwrap_or_default();
    config.market = match scenario.as_str() {
        "reliable" => MarketScenario::Reliable,
        "constant" => MarketScenario::Scheduled(SupplySchedule::Constant),
        "outage-window" => MarketScenario::Scheduled(SupplySchedule::OutageWindow {
            start: 40,
            length: 3,
        }),
        "random" => MarketScenario::Random {
            fill_probability: 0.9,
        },
        _ => config.market.clone(),
    };
    println!("Market scenario: {:?}", config.market);

    let exchange = match config.build_exchange() {
        Ok(exchange) => exchange,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // 3. INITIALIZE SIMULATION
    let mut sim = match ReactorSimulation::new(
        config.clone(),
        Box::new(RecipeBook::with_standard_recipes()),
        exchange,
    ) {
        Ok(sim) => sim,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // 4. RUN SIMULATION
    println!("Running simulation for {} steps...", config.max_steps);
    let outcome = sim.run();

    // 5. EXPORT RESULTS
    let output_file = "reactor_history.csv";
    match reporting::write_simulation_log(output_file, &sim.history) {
        Ok(_) => println!("Success! Data written to ./{}", output_file),
        Err(e) => eprintln!("Error writing CSV: {}", e),
    }

    // 6. PRINT SUMMARY
    println!("\n=== Fuel Summary ===");
    println!("Steps completed: {}", sim.history.len());
    println!("Refuels: {}", sim.refuel_count());
    println!("Waste discharged: {:.1} kg", sim.total_waste_discharged());

    match outcome {
        Ok(()) => {
            println!("\nSimulation Complete.");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            println!("\nReactor halted: {}", failure);
            ExitCode::FAILURE
        }
    }
}
