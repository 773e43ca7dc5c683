//! Schema command - print the expected input and the merged output layout

use crate::record::NormalizedRecord;
use crate::schema::Schema;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema of one merged row
    JsonSchema,
    /// CSV header row of the merged output
    CsvHeader,
    /// Input and output column descriptions
    CsvFields,
    /// JSON Schema of the --schema override file
    SchemaConfig,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
            SchemaFormat::SchemaConfig => self.print_schema_config(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(NormalizedRecord);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_schema_config(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Schema);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        println!();
        println!("Defaults:");
        println!("{}", serde_json::to_string_pretty(&Schema::default())?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(NormalizedRecord::csv_columns())?;
        wtr.flush()?;
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Statement Input Format");
        println!("======================");
        println!();
        println!("Line 1 is a banner and is skipped, line 2 is the header.");
        println!("Columns are matched by name, extra columns are ignored:");
        for name in Schema::default().columns() {
            println!("  {}", name);
        }
        println!();
        println!("Merged Output Format");
        println!("====================");
        println!();
        for field in NormalizedRecord::csv_schema() {
            let presence = if field.always_present { "always" } else { "optional" };
            println!("{:42} ({:8})  {}", field.name, presence, field.description);
        }
        println!();
        println!("Dates are read as DD-Mon-YYYY and written as YYYY-MM-DD");
        Ok(())
    }
}
