//! Writes a synthetic Superstore-style sales CSV (Latin-1) for trying out the
//! dashboard.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]`

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use csv::{ByteRecord, Writer};

const REGIONS: &[(&str, &[&str])] = &[
    ("East", &["New York", "Pennsylvania", "Ohio", "Massachusetts", "Delaware"]),
    ("West", &["California", "Washington", "Oregon", "Arizona", "Utah"]),
    ("Central", &["Texas", "Illinois", "Michigan", "Indiana", "Wisconsin"]),
    ("South", &["Florida", "Georgia", "Kentucky", "Virginia", "Tennessee"]),
];

/// Names containing non-ASCII characters are written as single Latin-1 bytes.
const CATEGORIES: &[(&str, &[&str], f64)] = &[
    (
        "Furniture",
        &["Bretford Conference Table", "Hon Deluxe Chair", "Eldon Bookcase", "Café Lounge Stool"],
        180.0,
    ),
    (
        "Office Supplies",
        &["Avery Labels", "Staple Envelope", "Xerox Paper", "Eldon Fold 'N Roll Cart", "Tenex Désk Mat"],
        40.0,
    ),
    (
        "Technology",
        &["Apple iPhone", "Logitech Mouse", "Canon imageCLASS Copier", "Plantronics Headset ®"],
        320.0,
    ),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Encode as Latin-1; characters outside it become `?`.
fn latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_superstore.csv".to_string());
    let n_rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 2000,
    };

    let mut rng = SimpleRng::new(42);
    let first_day = NaiveDate::from_ymd_opt(2014, 1, 3).context("invalid start date")?;

    let mut writer = Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "Row ID",
        "Order Date",
        "Region",
        "State",
        "Category",
        "Product Name",
        "Sales",
        "Profit",
    ])?;

    for row_id in 1..=n_rows {
        let (region, states) = *rng.pick(REGIONS);
        let state = *rng.pick(states);
        let (category, products, typical_sale) = *rng.pick(CATEGORIES);
        let product = *rng.pick(products);

        let date = first_day + Duration::days((rng.next_u64() % 1460) as i64);
        let sales = (typical_sale * rng.gauss(0.0, 0.8).exp()).max(0.5);
        let margin = rng.gauss(0.12, 0.25).clamp(-0.8, 0.5);

        let mut record = ByteRecord::new();
        record.push_field(row_id.to_string().as_bytes());
        record.push_field(date.format("%-m/%-d/%Y").to_string().as_bytes());
        record.push_field(region.as_bytes());
        record.push_field(state.as_bytes());
        record.push_field(category.as_bytes());
        record.push_field(&latin1(product));
        record.push_field(format!("{sales:.4}").as_bytes());
        record.push_field(format!("{:.4}", sales * margin).as_bytes());
        writer.write_byte_record(&record)?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {n_rows} order lines to {output_path}");
    Ok(())
}
