//! Banetón command-line pricing
//!
//! Loads a fixture set, prices its cart at the configured instant and prints a receipt.

use std::{io, process::ExitCode};

use baneton::{
    checkout::CheckoutError,
    fixtures::{Fixture, FixtureError},
    receipt::{ReceiptError, write_receipt},
};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    config::PricingConfig,
    logging::init_logging,
};

mod config;
mod logging;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

fn main() -> ExitCode {
    let config = match PricingConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // Logging is not initialised yet; clap renders its own message.
            _ = error.print();

            return ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(1));
        }
    };

    if let Err(error) = init_logging(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "pricing failed");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &PricingConfig) -> Result<(), AppError> {
    let mut fixture = Fixture::with_base_path(&config.fixtures);

    fixture
        .load_products(&config.set)?
        .load_promotions(&config.set)?
        .load_cart(config.cart_name())?;

    let at = config.point_in_time();

    info!(set = %config.set, cart = config.cart_name(), %at, "pricing cart");

    let order = fixture.checkout().place_order(fixture.cart()?, at)?;

    write_receipt(io::stdout().lock(), &order)?;

    Ok(())
}
