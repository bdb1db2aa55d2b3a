pub mod stats;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "crimestats",
    version,
    about = "Monthly counts of reportable, violent and homicide incidents as CSV."
)]
pub struct Cli {
    /// Name of the incident codes (IUCR) CSV file
    #[arg(long, default_value = "", hide_default_value = true)]
    pub iucr: String,
    /// Name of the crime records CSV file
    #[arg(long, default_value = "", hide_default_value = true)]
    pub crimes: String,
}
