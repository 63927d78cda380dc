//! Emulates the third-party scheduling system.
//!
//! Appointments are loaded once from a JSON file and re-shaped on every call
//! into one of three incompatible record formats, chosen by index
//! (`index % 3` gives A, B, C).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::constants::SLOT_DURATION_MINUTES;
use crate::error::Result;
use crate::metrics::SourcesMetrics;
use crate::pipeline::processing::normalize::records::{
    Doctor, FormatARecord, FormatBRecord, FormatCRecord, RawSlotRecord, TimeRange,
};

/// One appointment as the upstream stores it internally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub doctor_id: String,
    pub doctor_name: String,
    /// `HH:MM` start times
    pub slots: Vec<String>,
    pub appointment_type: String,
}

#[derive(Debug, Deserialize)]
struct AppointmentsFile {
    #[serde(default)]
    appointments: Vec<Appointment>,
}

#[derive(Debug, Clone)]
pub struct SourceEmulator {
    appointments: Vec<Appointment>,
}

impl SourceEmulator {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    /// Loads appointments from `path`. A missing, unreadable or empty file
    /// falls back to the built-in appointments.
    pub fn load(path: &Path) -> Self {
        info!("Attempting to load appointments from: {}", path.display());

        let appointments = match Self::read_appointments(path) {
            Ok(list) if !list.is_empty() => {
                info!("Loaded {} appointments from file", list.len());
                list
            }
            Ok(_) => {
                warn!("No appointments found in {}, using built-in data", path.display());
                SourcesMetrics::record_fixture_fallback();
                builtin_appointments()
            }
            Err(e) => {
                warn!("Failed to load appointments from {}: {}", path.display(), e);
                SourcesMetrics::record_fixture_fallback();
                builtin_appointments()
            }
        };

        Self { appointments }
    }

    fn read_appointments(path: &Path) -> Result<Vec<Appointment>> {
        let content = fs::read_to_string(path)?;
        let parsed: AppointmentsFile = serde_json::from_str(&content)?;
        Ok(parsed.appointments)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Every appointment, each shaped as format A, B or C by its index
    pub fn generate_records(&self) -> Vec<RawSlotRecord> {
        self.appointments
            .iter()
            .enumerate()
            .map(|(index, appointment)| match index % 3 {
                0 => RawSlotRecord::A(to_format_a(appointment)),
                1 => RawSlotRecord::B(to_format_b(appointment)),
                _ => RawSlotRecord::C(to_format_c(appointment)),
            })
            .collect()
    }

    /// The upstream wire payload: [`generate_records`](Self::generate_records) as JSON
    pub fn generate_messy_response(&self) -> Result<Vec<Value>> {
        let records = self
            .generate_records()
            .iter()
            .map(RawSlotRecord::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        info!("Generated {} appointment records using 3 messy formats", records.len());
        Ok(records)
    }
}

impl Default for SourceEmulator {
    fn default() -> Self {
        Self::new(builtin_appointments())
    }
}

fn to_format_a(appointment: &Appointment) -> FormatARecord {
    FormatARecord {
        date: appointment.date.clone(),
        times: appointment.slots.clone(),
        doctor: Doctor {
            name: appointment.doctor_name.clone(),
            id: Some(Value::from(appointment.doctor_id.as_str())),
        },
        appointment_type: Some(Value::from(appointment.appointment_type.as_str())),
    }
}

fn to_format_b(appointment: &Appointment) -> FormatBRecord {
    FormatBRecord {
        available_on: appointment.date.replace('-', "/"),
        slots: appointment
            .slots
            .iter()
            .map(|start| TimeRange {
                start: start.clone(),
                end: add_minutes(start, SLOT_DURATION_MINUTES).map(Value::from),
            })
            .collect(),
        provider: appointment.doctor_name.clone(),
        category: Some(Value::from(appointment.appointment_type.as_str())),
    }
}

fn to_format_c(appointment: &Appointment) -> FormatCRecord {
    FormatCRecord {
        appointment_day: appointment.date.clone(),
        free_slots: appointment.slots.clone(),
        physician_name: appointment.doctor_name.clone(),
        physician_code: Some(Value::from(appointment.doctor_id.as_str())),
        service_type: Some(Value::from(appointment.appointment_type.as_str())),
        duration_minutes: Some(Value::from(SLOT_DURATION_MINUTES)),
    }
}

/// Adds `minutes` to an `HH:MM` time. Hours are not wrapped at midnight.
/// Returns `None` if `time` is not `HH:MM` or the result overflows.
pub fn add_minutes(time: &str, minutes: u32) -> Option<String> {
    let (hours, mins) = time.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let mins: u32 = mins.trim().parse().ok()?;

    let total = hours.checked_mul(60)?.checked_add(mins)?.checked_add(minutes)?;
    Some(format!("{:02}:{:02}", total / 60, total % 60))
}

/// Appointments used when no data file is available
pub fn builtin_appointments() -> Vec<Appointment> {
    vec![
        appointment("1", "2025-07-20", "d1001", "Dr. Smith", &["09:00", "10:30", "13:15", "14:45"], "NewPatient"),
        appointment("2", "2025-07-21", "d1002", "Dr. Lee", &["10:00", "11:00", "15:30"], "General"),
        appointment("3", "2025-07-22", "d1003", "Dr. Johnson", &["08:30", "09:30", "11:15", "16:00"], "Cleaning"),
        appointment("4", "2025-07-23", "d1001", "Dr. Smith", &["09:15", "12:00", "14:30"], "Emergency"),
        appointment("5", "2025-07-24", "d1002", "Dr. Lee", &["10:45", "13:30", "15:15"], "Consultation"),
    ]
}

fn appointment(id: &str, date: &str, doctor_id: &str, doctor_name: &str, slots: &[&str], kind: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        date: date.to_string(),
        doctor_id: doctor_id.to_string(),
        doctor_name: doctor_name.to_string(),
        slots: slots.iter().map(|s| s.to_string()).collect(),
        appointment_type: kind.to_string(),
    }
}
