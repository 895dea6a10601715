//! Synthetic registry data for local development.
//!
//! The mock source never touches the spreadsheet. Its boats are generated
//! once when the source is built and served as ordinary positional rows, so
//! they travel through the same cache and mapper as live data.

use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::boat::{Boat, RawRow};
use crate::error::Result;
use crate::source::{RowSource, SourceKind};

const DISTRICTS: &[&str] = &["Sơn Trà", "Thanh Khê", "Ngũ Hành Sơn", "Liên Chiểu", "Hải Châu"];

const BOAT_GROUPS: &[&str] = &[
    "Câu Rê",
    "Rê",
    "Rê 5",
    "Rê 6",
    "Rê 7",
    "Rê 8",
    "Rê 10",
    "Câu",
    "Câu vồng",
    "Lưới kéo",
    "Lưới rê",
    "Công suất từ 90cv - nhỏ hơn 400cv",
    "Công suất từ 400cv - nhỏ hơn 1000cv",
    "Công suất từ 1000cv trở lên",
];

const MAIN_JOBS: &[&str] = &[
    "Đánh bắt cá ngừ",
    "Đánh bắt cá ngừ đại dương",
    "Đánh bắt cá ngừ vây xanh",
    "Đánh bắt tôm hùm",
    "Đánh bắt cá cơm",
    "Đánh bắt cá trích",
    "Đánh bắt mực",
    "Đánh bắt ghẹ",
    "Đánh bắt cá tạp",
    "Đánh bắt cá tạp ven biển",
    "Đánh bắt cá hồng",
    "Đánh bắt tôm",
];

const SIDE_JOBS: &[&str] = &[
    "Đánh bắt cá mực",
    "Đánh bắt cá",
    "Đánh bắt cá cơm",
    "Đánh bắt cá trích",
    "Đánh bắt cá bè",
    "Đánh bắt cá kiếm",
    "Đánh bắt cá nhám",
    "Đánh bắt cá cờ",
    "Đánh bắt cá bơn",
    "Đánh bắt mực",
    "Đánh bắt ghẹ",
    "Đánh bắt tôm",
    "Đánh bắt cá tạp",
    "Rê",
    "Không",
];

const FAMILY_NAMES: &[&str] = &[
    "Nguyễn", "Trần", "Lê", "Phạm", "Hoàng", "Phan", "Vũ", "Võ", "Đặng", "Bùi", "Đỗ", "Hồ", "Ngô",
    "Dương", "Lý",
];

const MIDDLE_NAMES: &[&str] = &[
    "Văn", "Thị", "Minh", "Thanh", "Hữu", "Đức", "Quang", "Anh", "Công", "Thành", "Tấn", "Xuân",
    "Tiến", "Hoài",
];

const GIVEN_NAMES: &[&str] = &[
    "An", "Bình", "Cường", "Đức", "Em", "Phúc", "Giang", "Hạnh", "Xuân", "Khánh", "Long", "Minh",
    "Nam", "Oanh", "Phát", "Quang", "Rô", "Sơn", "Cẩm", "Dàng", "Thanh", "Tài", "Hoa", "Hùng",
    "Kiên", "Linh", "Mai", "Nga", "Phương",
];

const STREETS: &[&str] = &[
    "Võ Nguyên Giáp",
    "Trường Sa",
    "Hoàng Sa",
    "Nguyễn Hữu Thọ",
    "Ngô Quyền",
    "Điện Biên Phủ",
    "Hùng Vương",
    "Lê Duẩn",
    "Tôn Đức Thắng",
    "Lê Lợi",
    "Phan Châu Trinh",
    "Trần Phú",
    "Lý Thường Kiệt",
    "Nguyễn Tri Phương",
    "Hoàng Diệu",
    "Nguyễn Văn Linh",
    "Hải Phòng",
    "Ông Ích Khiêm",
    "Núi Thành",
    "Nguyễn Tất Thành",
];

const PHONE_PREFIXES: &[&str] = &[
    "090", "091", "093", "094", "097", "098", "032", "033", "034", "035", "036", "037", "038",
    "039",
];

const CITIZEN_ID_PREFIXES: &[&str] = &["048", "049", "201", "301"];

/// Generates synthetic boats.
#[derive(Debug)]
pub struct MockGenerator {
    rng: StdRng,
    current_year: i32,
}

impl MockGenerator {
    /// Create a generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create a deterministic generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Generate boats with serial numbers `1..=count`.
    pub fn generate(&mut self, count: usize) -> Vec<Boat> {
        (1..=count).map(|id| self.boat(id)).collect()
    }

    /// Generate the boat with the given serial number.
    pub fn boat(&mut self, id: usize) -> Boat {
        let district = self.pick(DISTRICTS);
        let registration_date = self.date(2020, 2025);
        let boat_group = self.pick(BOAT_GROUPS);

        let crew_size = if boat_group.contains("90cv") {
            self.int(3, 5)
        } else if boat_group.contains("400cv") {
            self.int(6, 10)
        } else if boat_group.contains("1000cv") {
            self.int(10, 15)
        } else {
            self.int(4, 12)
        };

        // Lengths are drawn in tenths of a metre
        let (length_tenths, total_power) = if boat_group.contains("90cv - nhỏ hơn 400cv") {
            (self.int(80, 140), self.int(90, 390))
        } else if boat_group.contains("400cv - nhỏ hơn 1000cv") {
            (self.int(140, 200), self.int(400, 990))
        } else if boat_group.contains("1000cv trở lên") {
            (self.int(200, 300), self.int(1000, 2000))
        } else {
            (self.int(100, 250), self.int(250, 1200))
        };

        let expiry_years = self.int(1, 3);
        let serial = id.to_string();

        Boat {
            id: serial.clone(),
            serial_number: serial,
            district: district.to_string(),
            boat_number: self.boat_number(id),
            inspection_expiry_date: add_years(&registration_date, expiry_years),
            registration_date,
            boat_group: boat_group.to_string(),
            main_job: self.pick(MAIN_JOBS).to_string(),
            side_job: self.pick(SIDE_JOBS).to_string(),
            boat_members: crew_size.to_string(),
            owner_name: self.name(),
            citizen_id: self.citizen_id(),
            phone: self.phone(),
            address: self.address(district),
            inspection_number: self.inspection_number(id),
            boat_length: format!("{}.{}0", length_tenths / 10, length_tenths % 10),
            total_power: total_power.to_string(),
        }
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.rng.random_range(0..items.len())]
    }

    fn int(&mut self, min: u32, max: u32) -> u32 {
        self.rng.random_range(min..=max)
    }

    fn date(&mut self, start_year: u32, end_year: u32) -> String {
        let year = self.int(start_year, end_year);
        let month = self.int(1, 12);
        // Day capped at 28 so every month is valid
        let day = self.int(1, 28);
        format_date(year, month, day)
    }

    fn name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(FAMILY_NAMES),
            self.pick(MIDDLE_NAMES),
            self.pick(GIVEN_NAMES)
        )
    }

    fn boat_number(&mut self, id: usize) -> String {
        let base = 90_000 + id;
        if self.rng.random::<f64>() > 0.3 {
            format!("ĐNa-{base}-TS")
        } else {
            let digits = base.to_string();
            format!("ĐN-{}", &digits[digits.len().saturating_sub(5)..])
        }
    }

    fn inspection_number(&mut self, id: usize) -> String {
        match self.rng.random_range(0..4) {
            0 => format!("{id:06}/ĐN"),
            1 => format!("{}/ĐKTC", 90_000 + id),
            2 => format!("{}/ĐNa", 90_000 + id),
            _ => format!("{id:03}/{}", self.current_year),
        }
    }

    fn address(&mut self, district: &str) -> String {
        if self.rng.random::<f64>() > 0.5 {
            format!("Tổ {}, Phường {district}, Đà Nẵng", self.int(1, 99))
        } else {
            let number = self.int(1, 999);
            let street = self.pick(STREETS);
            format!("{number} Đường {street}, Quận {district}, Đà Nẵng")
        }
    }

    fn phone(&mut self) -> String {
        let prefix = self.pick(PHONE_PREFIXES);
        format!("{prefix}{}", self.int(1_000_000, 9_999_999))
    }

    fn citizen_id(&mut self) -> String {
        let prefix = self.pick(CITIZEN_ID_PREFIXES);
        format!(
            "{prefix}{}{}",
            self.int(100_000, 999_999),
            self.int(1000, 9999)
        )
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn format_date(year: u32, month: u32, day: u32) -> String {
    format!("{day:02}/{month:02}/{year}")
}

/// Shift a dd/mm/yyyy date by whole years. Unparseable input is returned as is.
fn add_years(date: &str, years: u32) -> String {
    let parts: Vec<u32> = date.split('/').filter_map(|p| p.parse().ok()).collect();
    match parts.as_slice() {
        [day, month, year] => format_date(year + years, *month, *day),
        _ => date.to_string(),
    }
}

/// Row source serving a fixed set of synthetic boats.
#[derive(Debug, Clone)]
pub struct MockSource {
    boats: Vec<Boat>,
}

impl MockSource {
    /// Generate `count` boats, deterministically when a seed is given.
    #[must_use]
    pub fn generate(count: usize, seed: Option<u64>) -> Self {
        let mut generator = seed.map_or_else(MockGenerator::new, MockGenerator::with_seed);
        let boats = generator.generate(count);
        info!(count, seeded = seed.is_some(), "Generated mock boats");
        Self { boats }
    }

    /// The boats this source serves.
    #[must_use]
    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }
}

#[async_trait::async_trait]
impl RowSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Mock
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.boats.iter().map(Boat::to_row).collect())
    }
}
