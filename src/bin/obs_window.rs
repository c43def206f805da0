extern crate halosat_window as hw;

use anyhow::{Context, Result};
use clap::{App, Arg};

use hw::{
    compute_antipodal_window,
    coordinates::{format_degrees, format_hours},
    fits::{read_map, write_map},
    healpix::{npix2nside, RingPixelization, SkyPixelization},
    mask_window, ObsCfg, SkyError,
};

fn main() -> Result<()> {
    env_logger::init();
    let matches = App::new("obs_window")
        .about("Observing window around the antisolar point on a UT date")
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .takes_value(true)
                .value_name("UT date")
                .required(true)
                .help("UT date, e.g. '2019/3/9 5:13'"),
        )
        .arg(
            Arg::new("radius")
                .short('r')
                .long("radius")
                .takes_value(true)
                .value_name("deg")
                .required(false)
                .help("maximum deviation from the antisolar point"),
        )
        .arg(
            Arg::new("map")
                .short('m')
                .long("map")
                .takes_value(true)
                .value_name("healpix fits")
                .required(false)
                .help("sky map to draw the window on"),
        )
        .arg(
            Arg::new("nside")
                .short('n')
                .long("nside")
                .takes_value(true)
                .value_name("nside")
                .required(false)
                .help("resolution of the output map"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("out")
                .takes_value(true)
                .value_name("output file name")
                .required(false)
                .help("masked healpix map"),
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
        .get_matches();

    let cfg = match matches.value_of("cfg") {
        Some(path) => ObsCfg::from_file(path).with_context(|| format!("loading {}", path))?,
        None => ObsCfg::default(),
    };
    let date = matches.value_of("date").context("missing date")?;
    let radius = match matches.value_of("radius") {
        Some(r) => r.parse::<f64>().context("radius")?,
        None => cfg.window.radius_deg,
    };

    let window = compute_antipodal_window(date, radius)?;
    println!("On the date {}", window.time);
    println!("The RA of the Sun is {}", format_hours(window.sun.ra));
    println!("The Dec of the Sun is {}", format_degrees(window.sun.dec));
    println!("So the instrument will observe");
    println!("      RA  {}", format_hours(window.center.ra));
    println!("      DEC {}", format_degrees(window.center.dec));
    println!(
        "Window centre l={:.4} b={:.4} deg, Sun l={:.4} b={:.4} deg",
        window.center_galactic.lon_degrees(),
        window.center_galactic.lat_degrees(),
        window.sun_galactic.lon_degrees(),
        window.sun_galactic.lat_degrees()
    );
    for label in window.label_positions() {
        println!("label {:>12} at l={:.3} b={:.3}", label.text, label.lon_deg, label.lat_deg);
    }

    let nside_arg = match matches.value_of("nside") {
        Some(n) => Some(n.parse::<usize>().context("nside")?),
        None => None,
    };
    let base = match matches.value_of("map") {
        Some(path) => read_map(path).with_context(|| format!("reading {}", path))?,
        None => {
            let pix = RingPixelization::new(nside_arg.unwrap_or(cfg.window.nside))?;
            vec![0.0; pix.pixel_count()]
        }
    };
    let nside = match nside_arg {
        Some(n) => n,
        None => npix2nside(base.len()).ok_or(SkyError::InvalidPixelCount(base.len()))?,
    };

    let masked = mask_window(&base, nside, &window)?;
    println!("{}", window);
    if let Some(out) = matches.value_of("outfile") {
        write_map(out, &[&masked], true).with_context(|| format!("writing {}", out))?;
    }
    Ok(())
}
