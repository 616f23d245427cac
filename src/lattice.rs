use nalgebra::Vector2;

/// Side length of a square lattice holding `n` sites, if `n` is a non-zero
/// perfect square.
pub fn perfect_square_side(n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let square = |s: usize| s.checked_mul(s);
    let mut side = (n as f64).sqrt() as usize;
    // float sqrt may be off by one either way for large n
    while square(side).map_or(true, |sq| sq > n) {
        side -= 1;
    }
    while square(side + 1).is_some_and(|sq| sq <= n) {
        side += 1;
    }
    (square(side) == Some(n)).then_some(side)
}

/// Square `side x side` lattice with period `spacing`, centred on the origin.
///
/// Sites are emitted centre-out: each time the remaining site nearest to the
/// centre is taken, with ties resolved by increasing polar angle. The result
/// spirals outward ring by ring rather than following raster order.
pub fn centered_lattice(side: usize, spacing: f64) -> Vec<Vector2<f64>> {
    // Offsets in half-periods: 2k - (side - 1) keeps everything integral, so
    // distance ties are exact.
    let half_offset = |k: usize| 2 * k as i64 - (side as i64 - 1);

    let mut available: Vec<(i64, i64)> = (0..side)
        .flat_map(|i| (0..side).map(move |j| (half_offset(i), half_offset(j))))
        .collect();

    let mut sites = Vec::with_capacity(available.len());
    while !available.is_empty() {
        let nearest = available
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = a.0 * a.0 + a.1 * a.1;
                let db = b.0 * b.0 + b.1 * b.1;
                da.cmp(&db).then_with(|| polar_angle(**a).total_cmp(&polar_angle(**b)))
            })
            .map(|(idx, _)| idx);

        let Some(idx) = nearest else { break };
        let (hx, hy) = available.remove(idx);
        sites.push(Vector2::new(hx as f64, hy as f64) * (0.5 * spacing));
    }
    sites
}

#[inline]
fn polar_angle((hx, hy): (i64, i64)) -> f64 {
    (hy as f64).atan2(hx as f64)
}
