//! Writes `sample_nashville.csv`: a deterministic synthetic listings file
//! in the shape of the Nashville Airbnb export, including the dirty values
//! the cleaning path has to cope with (currency-formatted prices, `N/A`
//! tokens, blank cells, out-of-range join years).

use anyhow::{Context, Result};

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let neighbourhoods = [
        "Downtown",
        "East Nashville",
        "The Gulch",
        "Germantown",
        "Berry Hill",
        "Antioch",
        "12 South",
        "Green Hills",
    ];
    let room_types = ["Entire home/apt", "Private room", "Shared room", "Hotel room"];
    let property_types = ["House", "Apartment", "Condominium", "Guest suite", "Loft"];
    let superhost_tokens = ["t", "f", "t", "f", "TRUE", "false"];

    let output_path = "sample_nashville.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer
        .write_record([
            "host_id",
            "host_since",
            "price",
            "reviews_per_month",
            "review_scores_rating",
            "calculated_host_listings_count",
            "neighbourhood_cleansed",
            "host_is_superhost",
            "room_type",
            "property_type",
        ])
        .context("writing CSV header")?;

    let n_rows = 800;
    for i in 0..n_rows {
        let host_id = 10_000 + i as i64 * 7;
        let year = 2009 + (rng.next_u64() % 15) as i32;
        let month = 1 + (rng.next_u64() % 12) as u32;
        let day = 1 + (rng.next_u64() % 28) as u32;
        let host_since = format!("{month:02}/{day:02}/{year}");

        // Log-ish price spread with a heavy tail for the outlier trim.
        let base = rng.range(40.0, 220.0);
        let price_value = if rng.next_f64() < 0.06 {
            base * rng.range(5.0, 20.0)
        } else {
            base
        };

        // A slice of rows carries the dirty formats seen in real exports.
        let dirt = rng.next_f64();
        let price = if dirt < 0.10 {
            format!("${:.0}", price_value)
        } else if dirt < 0.14 {
            // Comma-grouped luxury price, e.g. "$1,350".
            let big = 1_000 + (price_value * 5.0) as i64;
            format!("${},{:03}", big / 1_000, big % 1_000)
        } else if dirt < 0.16 {
            "N/A".to_string()
        } else {
            format!("{price_value:.0}")
        };

        let reviews = if rng.next_f64() < 0.05 {
            String::new()
        } else {
            format!("{:.2}", rng.range(0.0, 8.0))
        };
        let rating = format!("{:.1}", rng.range(3.0, 5.0));
        let listings_count = format!("{}", 1 + (rng.next_u64() % 12));

        // The occasional pre-founding or future join date.
        let host_since = if rng.next_f64() < 0.02 {
            "06/15/2004".to_string()
        } else if rng.next_f64() < 0.02 {
            "01/01/2099".to_string()
        } else {
            host_since
        };

        writer
            .write_record([
                host_id.to_string().as_str(),
                &host_since,
                &price,
                &reviews,
                &rating,
                &listings_count,
                *rng.pick(&neighbourhoods),
                *rng.pick(&superhost_tokens),
                *rng.pick(&room_types),
                *rng.pick(&property_types),
            ])
            .with_context(|| format!("writing row {i}"))?;
    }

    writer.flush().context("flushing output")?;
    println!("Wrote {n_rows} synthetic listings to {output_path}");
    Ok(())
}
