#![allow(non_snake_case)]

use std::time::Instant;

use tracing::info;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

use isogeny::{
    elliptic::{
        curve::Curve,
        isogeny_chain::{CompositeIsogeny, StrategyParams},
        point::PointX,
    },
    fields::smooth::SmoothFp2 as Fp2,
};

// x(Q) for a point Q of order 163^16 on y^2 = x^3 + x
const Q_X_RE_BYTES: [u8; 31] = [
    118, 241, 155, 23, 243, 208, 140, 252, 174, 149, 216, 233, 237, 74, 71, 198, 246, 209, 86,
    117, 101, 162, 70, 220, 239, 163, 232, 36, 184, 7, 2,
];
const Q_X_IM_BYTES: [u8; 31] = [
    239, 37, 95, 109, 173, 69, 148, 192, 159, 248, 224, 72, 52, 57, 70, 90, 155, 175, 69, 221,
    163, 161, 224, 164, 118, 187, 148, 3, 81, 15, 0,
];
const QX: Fp2 = Fp2::const_decode_no_check(&Q_X_RE_BYTES, &Q_X_IM_BYTES);

fn main() {
    // RUST_LOG=isogeny=debug shows the split decisions of the planner
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer());
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("a global tracing subscriber is already installed");
    }

    let E = Curve::new(&Fp2::ZERO);
    let Q = PointX::from_x_coord(&QX);
    let degree = 163u128.pow(16);

    for split in [0.5, 0.8] {
        for velu_bound in [400, 100] {
            let params = StrategyParams::default()
                .with_split(split)
                .with_velu_bound(velu_bound);

            let start = Instant::now();
            let mut images = [Q];
            match CompositeIsogeny::new(&E, &Q, degree, &params, &mut images) {
                Ok(phi) => {
                    info!(
                        split,
                        velu_bound,
                        steps = phi.steps().len(),
                        elapsed = ?start.elapsed(),
                        "computed 163^16 isogeny"
                    );
                    println!("split = {split}, velu_bound = {velu_bound}");
                    println!("  j(E') = {}", phi.codomain().j_invariant());
                    println!("  phi(Q) = 0: {}", images[0].is_zero() == u32::MAX);
                }
                Err(e) => eprintln!("isogeny failed: {e}"),
            }
        }
    }
}
