//! # Scanbook CLI
//!
//! Command-line interface for the barcode test aid.
//!
//! ## Usage
//!
//! ```bash
//! # Render a linear symbol to PNG
//! scanbook render 049000000443 --png cola.png
//!
//! # Render a GS1 DataMatrix from an element string
//! scanbook render 010004900000044316251215 --symbology gs1_datamatrix --png milk.png
//!
//! # Build an element string from fields
//! scanbook gs1 --gtin 00049000000443 --sell-by 2025-12-15 --batch L42
//!
//! # List scanbooks and their items
//! scanbook list
//!
//! # Print a whole scanbook to one page
//! scanbook sheet basic-sale --png basic-sale.png
//!
//! # Run the portal
//! scanbook serve --listen 0.0.0.0:8080 --data-dir ./scanbook-data
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use scanbook::{
    ScanbookError,
    catalog::Catalog,
    gs1::{self, Gs1Fields, NetWeight, WeightUnit},
    render::{self, RenderSettings, render_sheet},
    server::{self, ServerConfig},
    symbol::{Readiness, SymbolAdapter, Symbology, linear},
};

/// Scanbook - Barcode sheets for retail POS testing
#[derive(Parser, Debug)]
#[command(name = "scanbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UnitArg {
    Kg,
    Lb,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one symbol
    Render {
        /// Value to encode (an element string for GS1 symbologies)
        value: String,

        /// Symbology (linear, code128, gs1_datamatrix, gs1_qr, qr, pdf417)
        #[arg(long, default_value = "linear")]
        symbology: String,

        /// Write a PNG instead of printing a summary
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Bar height in pixels (linear only)
        #[arg(long, default_value = "80")]
        height: usize,

        /// Pixels per module (2D only)
        #[arg(long, default_value = "4")]
        scale: usize,

        /// Leave out the human-readable text
        #[arg(long)]
        no_text: bool,
    },

    /// Build a GS1 element string from fields, or parse one
    Gs1 {
        #[arg(long)]
        gtin: Option<String>,
        #[arg(long)]
        sku: Option<String>,
        /// Production date (YYYY-MM-DD)
        #[arg(long)]
        production: Option<String>,
        /// Best-before date (YYYY-MM-DD)
        #[arg(long)]
        best_before: Option<String>,
        /// Sell-by date (YYYY-MM-DD)
        #[arg(long)]
        sell_by: Option<String>,
        /// Expiration date (YYYY-MM-DD)
        #[arg(long)]
        expiration: Option<String>,
        #[arg(long)]
        batch: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        /// Net weight
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long, value_enum, default_value = "kg")]
        unit: UnitArg,
        /// Reject invalid fields instead of dropping them
        #[arg(long)]
        strict: bool,
        /// Parse this element string instead of building one
        #[arg(long, value_name = "ELEMENT", conflicts_with_all = ["gtin", "sku", "strict"])]
        parse: Option<String>,
    },

    /// List scanbooks and items
    List {
        /// Only show this scanbook
        scanbook: Option<String>,
    },

    /// Render every item of a scanbook to one PNG
    Sheet {
        scanbook: String,

        #[arg(long, value_name = "FILE")]
        png: PathBuf,
    },

    /// Run the HTTP portal
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Directory for custom items (in-memory if omitted)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ScanbookError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            value,
            symbology,
            png,
            height,
            scale,
            no_text,
        } => {
            let symbology = Symbology::parse(&symbology).ok_or_else(|| {
                ScanbookError::InvalidArgument(format!("Unknown symbology '{}'", symbology))
            })?;

            let mut settings = RenderSettings::default();
            settings.linear = settings.linear.with_bar_height(height);
            settings.symbol.scale = scale.max(1);
            settings.symbol.include_text = !no_text;
            if no_text {
                settings.linear.text_height = 0;
            }

            let adapter = ready_adapter(symbology)?;
            let barcode = render::render_payload(symbology, &value, &adapter, &settings);

            match png {
                Some(path) => {
                    std::fs::write(&path, barcode.raster.to_png()?)?;
                    println!("Saved to {}", path.display());
                }
                None => print_summary(symbology, &value, &settings, &barcode),
            }
            if let render::Outcome::Placeholder(reason) = &barcode.outcome {
                eprintln!("Warning: drew a placeholder ({})", reason);
            }
        }

        Commands::Gs1 {
            gtin,
            sku,
            production,
            best_before,
            sell_by,
            expiration,
            batch,
            serial,
            weight,
            unit,
            strict,
            parse,
        } => {
            if let Some(input) = parse {
                let element = gs1::parse(&input)?;
                for segment in element.segments() {
                    println!("{:<16} {} {}", segment.ai.label(), segment.ai, segment.value);
                }
                println!("{}", element.to_display());
                return Ok(());
            }

            let fields = Gs1Fields {
                gtin,
                sku,
                production_date: production,
                best_before_date: best_before,
                sell_by_date: sell_by,
                expiration_date: expiration,
                batch,
                serial,
                net_weight: weight.map(|value| NetWeight {
                    value,
                    unit: match unit {
                        UnitArg::Kg => WeightUnit::Kg,
                        UnitArg::Lb => WeightUnit::Lb,
                    },
                }),
            };
            let element = if strict {
                gs1::build_strict(&fields)?
            } else {
                gs1::build(&fields)
            };
            println!("{}", element);
            println!("{}", element.to_display());
        }

        Commands::List { scanbook } => {
            let catalog = Catalog::builtin();
            for book in catalog.scanbooks() {
                if scanbook.as_deref().is_some_and(|id| id != book.id) {
                    continue;
                }
                println!("{} - {}", book.id, book.title);
                println!("  {}", book.description);
                for item in catalog.scanbook_items(&book.id).unwrap_or_default() {
                    println!(
                        "    {:<14} {:<24} {}",
                        item.sku,
                        item.name,
                        item.effective_symbology()
                    );
                }
                println!();
            }
        }

        Commands::Sheet { scanbook, png } => {
            let catalog = Catalog::builtin();
            let book = catalog.scanbook(&scanbook).ok_or_else(|| {
                ScanbookError::InvalidArgument(format!(
                    "Unknown scanbook '{}'. Run `scanbook list` to see available ones.",
                    scanbook
                ))
            })?;
            let items = catalog.scanbook_items(&scanbook).unwrap_or_default();

            let adapter = ready_adapter(Symbology::Gs1DataMatrix)?;
            let sheet = render_sheet(&book.title, &items, &adapter, &RenderSettings::default());
            std::fs::write(&png, sheet.to_png()?)?;
            println!("Saved {} items to {}", items.len(), png.display());
        }

        Commands::Serve { listen, data_dir } => {
            let config = ServerConfig {
                listen_addr: listen,
                data_dir,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
    }

    Ok(())
}

/// An adapter that has finished loading when `symbology` needs one.
fn ready_adapter(symbology: Symbology) -> Result<SymbolAdapter, ScanbookError> {
    let adapter = SymbolAdapter::builtin();
    if symbology.matrix().is_some() {
        let runtime = tokio::runtime::Runtime::new()?;
        if let Readiness::Failed(reason) = runtime.block_on(adapter.load()) {
            eprintln!("Warning: symbol backend unavailable ({})", reason);
        }
    }
    Ok(adapter)
}

/// Print a text rendition of a symbol.
fn print_summary(
    symbology: Symbology,
    value: &str,
    settings: &RenderSettings,
    barcode: &render::ItemBarcode,
) {
    println!("Symbology: {}", symbology);
    println!(
        "Size:      {}x{} px",
        barcode.raster.width(),
        barcode.raster.height()
    );
    if let Some(text) = &barcode.text {
        println!("Text:      {}", text);
    }

    if symbology == Symbology::Linear {
        let symbol = linear::encode_with(value, &settings.linear);
        println!("Digits:    {}", symbol.digits);
        let bars: String = symbol
            .to_bars()
            .iter()
            .map(|&bar| if bar { '█' } else { ' ' })
            .collect();
        println!("{}", bars);
    }
}
