//! Core boat record types for boatregistry.
//!
//! This module defines the boat record and the mapping from a raw positional
//! sheet row onto it.

use serde::{Deserialize, Serialize};

use crate::columns::{BoatField, COLUMN_COUNT};

/// A single sheet cell. `None` stands for a null or absent value.
pub type Cell = Option<String>;

/// A positional row as delivered by a row source. May be shorter than
/// [`COLUMN_COUNT`] when trailing cells are empty.
pub type RawRow = Vec<Cell>;

/// One boat registry entry.
///
/// Every field is a trimmed string and is empty rather than absent when the
/// sheet has no value. `id` always equals `serial_number`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boat {
    /// Identifier used in public URLs; a copy of `serial_number`.
    pub id: String,
    /// Row sequence number ("Số TT").
    pub serial_number: String,
    /// District of registration.
    pub district: String,
    /// Registration number.
    pub boat_number: String,
    /// Registration date (dd/mm/yyyy).
    pub registration_date: String,
    /// Boat group.
    pub boat_group: String,
    /// Main fishing activity.
    pub main_job: String,
    /// Secondary fishing activity.
    pub side_job: String,
    /// Crew size.
    pub boat_members: String,
    /// Registered owner.
    pub owner_name: String,
    /// Owner's citizen identity number.
    pub citizen_id: String,
    /// Owner's phone number.
    pub phone: String,
    /// Owner's address.
    pub address: String,
    /// Inspection book number.
    pub inspection_number: String,
    /// Inspection expiry date (dd/mm/yyyy).
    pub inspection_expiry_date: String,
    /// Maximum length in metres.
    pub boat_length: String,
    /// Total engine power.
    pub total_power: String,
}

impl Boat {
    /// Map a raw positional row onto a boat record.
    ///
    /// Cells are looked up by their fixed column position and trimmed. Cells
    /// that are null or past the end of the row become empty strings. This
    /// never fails.
    #[must_use]
    pub fn from_row(row: &[Cell]) -> Self {
        let cell = |field: BoatField| -> String {
            row.get(field.column_index())
                .and_then(Option::as_deref)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let serial_number = cell(BoatField::SerialNumber);

        Self {
            id: serial_number.clone(),
            serial_number,
            district: cell(BoatField::District),
            boat_number: cell(BoatField::BoatNumber),
            registration_date: cell(BoatField::RegistrationDate),
            boat_group: cell(BoatField::BoatGroup),
            main_job: cell(BoatField::MainJob),
            side_job: cell(BoatField::SideJob),
            boat_members: cell(BoatField::BoatMembers),
            owner_name: cell(BoatField::OwnerName),
            citizen_id: cell(BoatField::CitizenId),
            phone: cell(BoatField::Phone),
            address: cell(BoatField::Address),
            inspection_number: cell(BoatField::InspectionNumber),
            inspection_expiry_date: cell(BoatField::InspectionExpiryDate),
            boat_length: cell(BoatField::BoatLength),
            total_power: cell(BoatField::TotalPower),
        }
    }

    /// Lay the record back out as a full positional row.
    #[must_use]
    pub fn to_row(&self) -> RawRow {
        let mut row = vec![None; COLUMN_COUNT];
        for field in BoatField::all() {
            row[field.column_index()] = Some(self.field(field).to_string());
        }
        row
    }

    /// Value of the given field.
    #[must_use]
    pub fn field(&self, field: BoatField) -> &str {
        match field {
            BoatField::SerialNumber => &self.serial_number,
            BoatField::District => &self.district,
            BoatField::BoatNumber => &self.boat_number,
            BoatField::RegistrationDate => &self.registration_date,
            BoatField::BoatGroup => &self.boat_group,
            BoatField::MainJob => &self.main_job,
            BoatField::SideJob => &self.side_job,
            BoatField::BoatMembers => &self.boat_members,
            BoatField::OwnerName => &self.owner_name,
            BoatField::CitizenId => &self.citizen_id,
            BoatField::Phone => &self.phone,
            BoatField::Address => &self.address,
            BoatField::InspectionNumber => &self.inspection_number,
            BoatField::InspectionExpiryDate => &self.inspection_expiry_date,
            BoatField::BoatLength => &self.boat_length,
            BoatField::TotalPower => &self.total_power,
        }
    }

    /// Public page URL for this boat under the given application base URL.
    #[must_use]
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/boats/{}", base_url.trim_end_matches('/'), self.id)
    }
}

/// Serial number of a raw row, trimmed, without mapping the whole row.
#[must_use]
pub fn row_serial_number(row: &[Cell]) -> Option<&str> {
    row.get(BoatField::SerialNumber.column_index())
        .and_then(Option::as_deref)
        .map(str::trim)
}
