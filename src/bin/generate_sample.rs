use anyhow::{Context, Result};

/// Santiago de Compostela.
const REFERENCE: (f64, f64) = (42.8782, -8.5448);

const HEADER: [&str; 15] = [
    "Código",
    "Nome",
    "Enderezo",
    "Concello",
    "Provincia",
    "Cód. postal",
    "Teléfono",
    "Tipo de centro",
    "COORDENADA_X",
    "COORDENADA_Y",
    "TITULARIDADE",
    "ENSINO_CONCERTADO",
    "DEPENDENTE",
    "Distancia_Santiago_km",
    "Tiempo_Santiago_min",
];

/// (municipality, province, postal prefix, latitude, longitude)
const TOWNS: [(&str, &str, &str, f64, f64); 8] = [
    ("Santiago", "A Coruña", "157", 42.8782, -8.5448),
    ("A Coruña", "A Coruña", "150", 43.3623, -8.4115),
    ("Ferrol", "A Coruña", "154", 43.4839, -8.2320),
    ("Vigo", "Pontevedra", "362", 42.2328, -8.7226),
    ("Pontevedra", "Pontevedra", "360", 42.4336, -8.6477),
    ("Lugo", "Lugo", "270", 43.0128, -7.5566),
    ("Ourense", "Ourense", "320", 42.3364, -7.8640),
    ("Monforte de Lemos", "Lugo", "274", 42.5217, -7.5141),
];

const CENTER_TYPES: [&str; 4] = ["Colegio", "Instituto", "Guardería", "Escola de Idiomas"];

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Great-circle distance in km.
fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * 6371.0 * h.sqrt().asin()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_centros.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let n_rows = 200;
    let (mut n_swapped, mut n_broken) = (0, 0);

    for code in 1..=n_rows {
        let &(town, province, postal, lat0, lon0) = rng.pick(&TOWNS);
        let lat = lat0 + (rng.next_f64() - 0.5) * 0.1;
        let lon = lon0 + (rng.next_f64() - 0.5) * 0.1;

        // Road distance is ~1.3x straight line; ~1.1 min per km plus a stop.
        let road_km = haversine_km(REFERENCE, (lat, lon)) * 1.3;
        let minutes = road_km * 1.1 + 2.0 + rng.next_f64() * 5.0;

        let (mut x, mut y) = (format!("{lat:.4}"), format!("{lon:.4}"));
        if rng.chance(0.05) {
            std::mem::swap(&mut x, &mut y);
            n_swapped += 1;
        }

        let mut distance = format!("{road_km:.1}");
        let mut time = format!("{minutes:.0}");
        if rng.chance(0.03) {
            distance = "ERROR".to_string();
            n_broken += 1;
        } else if rng.chance(0.03) {
            time = "ERROR".to_string();
            n_broken += 1;
        }

        let public = rng.chance(0.6);
        let yes_no = |b: bool| if b { "Sí" } else { "No" };

        writer.write_record([
            code.to_string(),
            format!("Centro {code:03}"),
            format!("Rúa {} {}", town, rng.next_u64() % 120 + 1),
            town.to_string(),
            province.to_string(),
            format!("{postal}{:02}", rng.next_u64() % 100),
            format!("98{:07}", rng.next_u64() % 10_000_000),
            rng.pick(&CENTER_TYPES).to_string(),
            x,
            y,
            if public { "Pública" } else { "Privada" }.to_string(),
            yes_no(!public && rng.chance(0.7)).to_string(),
            yes_no(public).to_string(),
            distance,
            time,
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {n_rows} centers to {output_path} ({n_swapped} with swapped coordinates, {n_broken} with ERROR values)"
    );
    Ok(())
}
