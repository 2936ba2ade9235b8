use clap::Parser;

#[derive(Debug, Parser)]
#[clap(name = "buyer", version, about = "Shops against a seller using static and dynamic prices")]
pub struct Cli {
    /// Seller host
    #[clap(long, default_value = "localhost")]
    pub host: String,

    /// Seller line-protocol port
    #[clap(long, default_value_t = 5555)]
    pub port: u16,

    /// Total money available
    #[clap(long, default_value_t = 30_000_000.0)]
    pub budget: f64,

    /// Highest accepted markup of the market price over the catalog price (0.10 = 10%)
    #[clap(long, default_value_t = 0.10)]
    pub max_markup: f64,

    /// Pause between items, in milliseconds
    #[clap(long, default_value_t = 1_000)]
    pub pause_ms: u64,

    /// Items to consider, in order
    #[clap(default_values_t = ["laptop".to_string(), "smartphone".to_string(), "headphones".to_string()])]
    pub items: Vec<String>,
}
