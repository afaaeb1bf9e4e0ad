//! `intake slots` command - List the selectable time slots

use chrono::NaiveTime;
use console::style;
use miette::Result;

use crate::cli::helpers::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::timeslots::{slot_for, time_slots};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct SlotsArgs {
    /// Only print the slot a time of day (HH:MM or HH:MM:SS) falls in
    #[arg(long, value_parser = parse_time)]
    pub at: Option<NaiveTime>,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("invalid time of day: {}", s))
}

pub fn run(args: SlotsArgs, global: &GlobalOpts) -> Result<()> {
    let format = global.resolved_format(&Config::load());

    if let Some(time) = args.at {
        let slot = slot_for(time);
        return match format {
            OutputFormat::Json | OutputFormat::Yaml => print_structured(&slot, format),
            _ => {
                println!("{}", slot);
                Ok(())
            }
        };
    }

    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(&time_slots(), format),
        _ => {
            for slot in time_slots() {
                println!("{}", slot);
            }
            if !global.quiet {
                eprintln!("{}", style(format!("{} slots", time_slots().len())).dim());
            }
            Ok(())
        }
    }
}
