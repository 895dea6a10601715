//! Fixed column positions of the registry sheet.
//!
//! Rows are resolved purely by index. Header text is never consulted, so the
//! sheet must keep this column order.

use serde::{Deserialize, Serialize};

/// Number of columns the registry reads from each row (A through P).
pub const COLUMN_COUNT: usize = 16;

/// A named field of a boat record backed by one sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatField {
    /// Row sequence number, also used as the record identifier.
    SerialNumber,
    /// District of registration.
    District,
    /// Registration number painted on the hull.
    BoatNumber,
    /// Registration date (dd/mm/yyyy).
    RegistrationDate,
    /// Boat group.
    BoatGroup,
    /// Main fishing activity.
    MainJob,
    /// Secondary fishing activity.
    SideJob,
    /// Crew size.
    BoatMembers,
    /// Registered owner.
    OwnerName,
    /// Owner's citizen identity number.
    CitizenId,
    /// Owner's phone number.
    Phone,
    /// Owner's address.
    Address,
    /// Inspection book number.
    InspectionNumber,
    /// Inspection expiry date (dd/mm/yyyy).
    InspectionExpiryDate,
    /// Maximum length in metres.
    BoatLength,
    /// Total engine power in horsepower.
    TotalPower,
}

/// The `(field, position)` table, in column order. This is the only place
/// column positions are written down.
pub const COLUMN_INDICES: [(BoatField, usize); COLUMN_COUNT] = [
    (BoatField::SerialNumber, 0),
    (BoatField::District, 1),
    (BoatField::BoatNumber, 2),
    (BoatField::RegistrationDate, 3),
    (BoatField::BoatGroup, 4),
    (BoatField::MainJob, 5),
    (BoatField::SideJob, 6),
    (BoatField::BoatMembers, 7),
    (BoatField::OwnerName, 8),
    (BoatField::CitizenId, 9),
    (BoatField::Phone, 10),
    (BoatField::Address, 11),
    (BoatField::InspectionNumber, 12),
    (BoatField::InspectionExpiryDate, 13),
    (BoatField::BoatLength, 14),
    (BoatField::TotalPower, 15),
];

impl BoatField {
    /// Zero-based column position of this field (A = 0), read from
    /// [`COLUMN_INDICES`].
    #[must_use]
    pub const fn column_index(self) -> usize {
        // Table rows are listed in variant order.
        COLUMN_INDICES[self as usize].1
    }

    /// Snake-case field name, as serialized.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SerialNumber => "serial_number",
            Self::District => "district",
            Self::BoatNumber => "boat_number",
            Self::RegistrationDate => "registration_date",
            Self::BoatGroup => "boat_group",
            Self::MainJob => "main_job",
            Self::SideJob => "side_job",
            Self::BoatMembers => "boat_members",
            Self::OwnerName => "owner_name",
            Self::CitizenId => "citizen_id",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::InspectionNumber => "inspection_number",
            Self::InspectionExpiryDate => "inspection_expiry_date",
            Self::BoatLength => "boat_length",
            Self::TotalPower => "total_power",
        }
    }

    /// Header text the registry sheet is expected to carry for this column.
    ///
    /// Reference only; mapping never depends on it.
    #[must_use]
    pub const fn header_label(self) -> &'static str {
        match self {
            Self::SerialNumber => "Số TT",
            Self::District => "Quận/huyện",
            Self::BoatNumber => "Số ĐK",
            Self::RegistrationDate => "Ngày ĐK",
            Self::BoatGroup => "Nhóm tàu",
            Self::MainJob => "Nghề chính",
            Self::SideJob => "Nghề phụ",
            Self::BoatMembers => "Số thuyền viên",
            Self::OwnerName => "Chủ phương tiện",
            Self::CitizenId => "Số CMND",
            Self::Phone => "Điện thoại",
            Self::Address => "Địa chỉ",
            Self::InspectionNumber => "Số sổ đăng kiểm/Sổ QLKT",
            Self::InspectionExpiryDate => "Ngày hết hạn đăng kiểm",
            Self::BoatLength => "Lmax (m)",
            Self::TotalPower => "Tổng công suất",
        }
    }

    /// Spreadsheet column letter of this field.
    #[must_use]
    pub fn column_letter(self) -> String {
        column_letter(self.column_index())
    }

    /// All fields in column order.
    pub fn all() -> impl Iterator<Item = BoatField> {
        COLUMN_INDICES.iter().map(|(field, _)| *field)
    }
}

impl std::fmt::Display for BoatField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a zero-based column index to A1-notation letters (0 = A, 26 = AA).
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation)]
        let letter = char::from(b'A' + rem as u8);
        letters.push(letter);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
