//! Supported command implementation

use clap::{Args, ValueEnum};

use super::{load_or_default, EXIT_CONFIG_ERROR};
use crate::domain::SampleFamily;

/// Record family selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    Quantity,
    Category,
    Correlation,
    Electrocardiogram,
    Workout,
    StateOfMind,
}

impl From<FamilyArg> for SampleFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Quantity => SampleFamily::Quantity,
            FamilyArg::Category => SampleFamily::Category,
            FamilyArg::Correlation => SampleFamily::Correlation,
            FamilyArg::Electrocardiogram => SampleFamily::Electrocardiogram,
            FamilyArg::Workout => SampleFamily::Workout,
            FamilyArg::StateOfMind => SampleFamily::StateOfMind,
        }
    }
}

/// Arguments for the supported command
#[derive(Args, Debug)]
pub struct SupportedArgs {
    /// Only list this family
    #[arg(short, long, value_enum)]
    pub family: Option<FamilyArg>,
}

impl SupportedArgs {
    /// Execute the supported command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mappings = match load_or_default(config_path).and_then(|c| c.load_mappings()) {
            Ok(mappings) => mappings,
            Err(e) => {
                eprintln!("❌ Failed to load mappings: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let families: Vec<SampleFamily> = match self.family {
            Some(family) => vec![family.into()],
            None => SampleFamily::ALL.to_vec(),
        };
        for family in families {
            let identifiers = mappings.mapped_identifiers(family);
            println!("{} ({})", family.document_key(), identifiers.len());
            for identifier in identifiers {
                println!("  {identifier}");
            }
        }
        Ok(0)
    }
}
