extern crate halosat_window as hw;

use anyhow::{Context, Result};
use clap::{App, Arg};

use hw::{
    coverage_fraction, fits::write_map, rasterize_coverage, sample_random_pointings, ObsCfg,
};

fn main() -> Result<()> {
    env_logger::init();
    let matches = App::new("random_pointings")
        .about("Coverage of uniformly random sky pointings")
        .arg(
            Arg::new("nside")
                .short('n')
                .long("nside")
                .takes_value(true)
                .value_name("nside")
                .required(false)
                .help("nside"),
        )
        .arg(
            Arg::new("count")
                .short('N')
                .long("count")
                .takes_value(true)
                .value_name("N")
                .required(false)
                .help("number of pointings"),
        )
        .arg(
            Arg::new("radius")
                .short('r')
                .long("radius")
                .takes_value(true)
                .value_name("deg")
                .required(false)
                .help("radius of a single pointing"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .takes_value(true)
                .value_name("seed")
                .required(false)
                .help("fix the random sequence"),
        )
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .takes_value(true)
                .value_name("yaml")
                .required(false)
                .help("observation config"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("out")
                .takes_value(true)
                .value_name("output file name")
                .required(false)
                .help("coverage healpix map"),
        )
        .get_matches();

    let mut cfg = match matches.value_of("cfg") {
        Some(path) => ObsCfg::from_file(path).with_context(|| format!("loading {}", path))?,
        None => ObsCfg::default(),
    }
    .pointings;
    if let Some(n) = matches.value_of("nside") {
        cfg.nside = n.parse().context("nside")?;
    }
    if let Some(n) = matches.value_of("count") {
        cfg.count = n.parse().context("count")?;
    }
    if let Some(r) = matches.value_of("radius") {
        cfg.radius_deg = r.parse().context("radius")?;
    }
    if let Some(s) = matches.value_of("seed") {
        cfg.seed = Some(s.parse().context("seed")?);
    }

    let pointings = sample_random_pointings(cfg.nside, cfg.count, cfg.seed)?;
    println!("{}", pointings.len());
    let coverage = rasterize_coverage(cfg.nside, &pointings, cfg.radius_deg)?;
    println!("covered fraction: {:.4}", coverage_fraction(&coverage));

    if let Some(out) = matches.value_of("outfile") {
        write_map(out, &[&coverage], true).with_context(|| format!("writing {}", out))?;
    }
    Ok(())
}
