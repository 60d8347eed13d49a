use std::{
    env,
    io::Write,
    process::{Command, Stdio},
    sync::Arc,
};

use anyhow::Context;
use chrono::{Local, NaiveDate};

use groomdesk::{
    app::CalendarData,
    calendar::{Appointment, CalendarDate, ViewMode, date::calendar_dates},
    storage::config::Config,
    sync::{api::GroomingApiClient, loader::CalendarLoader},
    ui::{overlap::find_overlaps, slots::groomer_appointment_count},
};

use crate::tui::sample::sample_data;

pub const USAGE: &str = "Usage: groomdesk [--agenda [YYYY-MM-DD]] [--week] [--sample]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliMode {
    Default { sample: bool, view: Option<ViewMode> },
    Agenda { date: NaiveDate, view: ViewMode, sample: bool },
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1), Local::now().date_naive())
}

fn parse_args(args: impl Iterator<Item = String>, today: NaiveDate) -> Result<CliMode, String> {
    let mut sample = false;
    let mut week = false;
    let mut agenda_date = None;
    let mut args = args.peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => {
                sample = true;
            }
            "--week" => {
                week = true;
            }
            "--agenda" => {
                let target_date = match args.next_if(|next| !next.starts_with("--")) {
                    Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", date_str))?,
                    None => today,
                };
                agenda_date = Some(target_date);
            }
            "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    if let Some(date) = agenda_date {
        let view = if week { ViewMode::Week } else { ViewMode::Day };
        Ok(CliMode::Agenda { date, view, sample })
    } else {
        Ok(CliMode::Default {
            sample,
            view: week.then_some(ViewMode::Week),
        })
    }
}

pub async fn run_agenda_mode(date: NaiveDate, view: ViewMode, sample: bool) -> anyhow::Result<()> {
    let data = if sample {
        sample_data(date)
    } else {
        let config = Config::load_or_create().context("loading config")?;
        let client = GroomingApiClient::from_config(&config.api)?;
        let loader = CalendarLoader::new(Arc::new(client));
        match loader.load(view, date).await {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Failed to fetch appointments: {}", e);
                CalendarData::default()
            }
        }
    };

    let dates = calendar_dates(view, date, Local::now().date_naive());
    let agenda = format_agenda_text(&dates, &data);
    display_with_pager(&agenda)?;
    Ok(())
}

fn format_agenda_text(dates: &[CalendarDate], data: &CalendarData) -> String {
    let mut lines = Vec::new();

    for date in dates {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("Agenda - {}", date.date.format("%A, %B %d, %Y")));

        let mut any = false;
        for groomer in &data.groomers {
            let count = groomer_appointment_count(&data.appointments, groomer.id, date.date);
            if count == 0 {
                continue;
            }
            any = true;

            lines.push(String::new());
            let noun = if count == 1 { "appointment" } else { "appointments" };
            lines.push(format!("{} ({} {})", groomer.name, count, noun));

            let mut appointments: Vec<&Appointment> = data
                .appointments
                .iter()
                .filter(|a| a.is_on(groomer.id, date.date))
                .collect();
            appointments.sort_by_key(|a| (a.start, a.id));

            for appointment in appointments {
                let overlapping = !find_overlaps(appointment, &data.appointments).is_empty();
                lines.push(format!("  {}", build_agenda_line(appointment, overlapping)));
            }

            for block in data.time_blocks.iter().filter(|b| b.is_on(groomer.id, date.date)) {
                lines.push(format!(
                    "  {:<19} -- {} --",
                    format!("{}-{}", block.start, block.end),
                    block.label()
                ));
            }
        }

        if !any {
            lines.push(String::new());
            lines.push("No appointments scheduled.".to_string());
        }
    }

    lines.join("\n")
}

fn build_agenda_line(appointment: &Appointment, overlapping: bool) -> String {
    let time_label = format!("{}-{}", appointment.start, appointment.end);
    let mut line = format!("{:<19} {}", time_label, appointment.pet_name);

    if !appointment.owner.is_empty() {
        line.push_str(&format!(" ({})", appointment.owner));
    }
    if !appointment.service.is_empty() {
        line.push_str(&format!(" - {}", appointment.service));
    }
    if let Some(status) = appointment.status {
        line.push_str(&format!(" [{}]", status.label()));
    }
    if overlapping {
        line.push_str(" !overlap");
    }
    line
}

fn display_with_pager(text: &str) -> std::io::Result<()> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let Some(cmd) = parts.next() else {
        println!("{text}");
        return Ok(());
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd).args(&args).stdin(Stdio::piped()).spawn() {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            println!("{text}");
        }
    }

    Ok(())
}
