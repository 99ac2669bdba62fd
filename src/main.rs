#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate rand;
extern crate surface_walk;

use std::path::PathBuf;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rand::Rng;

use surface_walk::analysis::{self, AngleUnit};
use surface_walk::errors::{ErrorKind, Result};
use surface_walk::math::Point;
use surface_walk::output;
use surface_walk::{simulate, WalkConfig};

fn point_arg<'a>(name: &'a str, long: &'a str) -> Arg<'a, 'a> {
    Arg::with_name(name)
        .long(long)
        .value_name("x,y,z")
        .takes_value(true)
}

fn cli<'a, 'b>() -> App<'a, 'b> {
    App::new("Surface walk.")
        .version("0.1.0")
        .about("Random walks constrained to the zero level set of an implicit field.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(SubCommand::with_name("walk")
            .about("Samples a sphere and runs random walkers on it.")
            .arg(Arg::with_name("walkers")
                .long("walkers")
                .value_name("usize")
                .takes_value(true))
            .arg(Arg::with_name("steps")
                .long("steps")
                .value_name("usize")
                .takes_value(true))
            .arg(Arg::with_name("step_size")
                .long("step-size")
                .value_name("f64")
                .takes_value(true))
            .arg(Arg::with_name("grid_spacing")
                .long("grid-spacing")
                .value_name("f64")
                .takes_value(true))
            .arg(Arg::with_name("radius")
                .long("radius")
                .value_name("f64")
                .takes_value(true))
            .arg(point_arg("center", "center"))
            .arg(point_arg("start", "start"))
            .arg(Arg::with_name("log_every")
                .long("log-every")
                .value_name("usize")
                .takes_value(true))
            .arg(Arg::with_name("seed")
                .long("seed")
                .value_name("u64")
                .takes_value(true))
            .arg(Arg::with_name("output_dir")
                .long("output-dir")
                .value_name("DIR")
                .takes_value(true))
            .arg(Arg::with_name("snap")
                .long("snap")
                .help("Snap walkers to the sampling lattice after each projection."))
            .arg(Arg::with_name("dump_surface")
                .long("dump-surface")
                .help("Also write the sampled point cloud.")))
        .subcommand(SubCommand::with_name("analyze")
            .about("Reports the geodesic spread of saved walker positions.")
            .arg(Arg::with_name("input")
                .long("input")
                .value_name("FILE")
                .takes_value(true)
                .required(true))
            .arg(Arg::with_name("radius")
                .long("radius")
                .value_name("f64")
                .takes_value(true))
            .arg(point_arg("center", "center"))
            .arg(point_arg("start", "start"))
            .arg(Arg::with_name("units")
                .long("units")
                .possible_values(&["rad", "deg", "arc"])
                .default_value("rad")))
}

fn parse_point(value: &str) -> Result<Point> {
    let coordinates = value.split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<::std::result::Result<Vec<_>, _>>()?;
    if coordinates.len() != 3 {
        return Err(ErrorKind::InvalidConfig(format!("expected x,y,z but got '{}'", value)).into());
    }
    Ok(Point::new(coordinates[0], coordinates[1], coordinates[2]))
}

fn walk_config(matches: &ArgMatches) -> Result<WalkConfig> {
    let mut config = WalkConfig::default();
    if matches.is_present("walkers") {
        config.num_walkers = value_t!(matches, "walkers", usize)?;
    }
    if matches.is_present("steps") {
        config.num_steps = value_t!(matches, "steps", usize)?;
    }
    if matches.is_present("step_size") {
        config.step_size = value_t!(matches, "step_size", f64)?;
    }
    if matches.is_present("grid_spacing") {
        config.grid_spacing = value_t!(matches, "grid_spacing", f64)?;
    }
    if matches.is_present("radius") {
        config.radius = value_t!(matches, "radius", f64)?;
    }
    if let Some(center) = matches.value_of("center") {
        config.center = parse_point(center)?;
    }
    if let Some(start) = matches.value_of("start") {
        config.start = parse_point(start)?;
    }
    if matches.is_present("log_every") {
        config.log_every = value_t!(matches, "log_every", usize)?;
    }
    if let Some(dir) = matches.value_of("output_dir") {
        config.output_dir = PathBuf::from(dir);
    }
    config.snap = matches.is_present("snap");
    config.dump_surface = matches.is_present("dump_surface");
    config.seed = if matches.is_present("seed") {
        value_t!(matches, "seed", u64)?
    } else {
        rand::thread_rng().gen()
    };
    config.validate()?;
    Ok(config)
}

fn run_walk(matches: &ArgMatches) -> Result<()> {
    let config = walk_config(matches)?;
    info!("The walk seed is {}", config.seed);
    info!("Walking with params {:?}", config);

    let surface = config.build_surface()?;
    info!("Surface created with {} points.", surface.len());
    if config.dump_surface {
        output::write_points(config.output_dir.join(output::SURFACE_FILE), &surface)?;
    }

    let trajectories = simulate(&surface, &config)?;
    output::write_trajectories(&config.output_dir, &trajectories)?;

    let final_positions = trajectories.iter()
        .filter_map(|trajectory| trajectory.final_position().cloned())
        .collect::<Vec<_>>();
    let variance = analysis::angular_variance(&final_positions, &config.start, &config.center)?;
    info!("Angular variance of the final positions: {:.6} rad^2", variance);
    Ok(())
}

fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let defaults = WalkConfig::default();
    let radius = if matches.is_present("radius") {
        value_t!(matches, "radius", f64)?
    } else {
        defaults.radius
    };
    let center = match matches.value_of("center") {
        Some(center) => parse_point(center)?,
        None => defaults.center,
    };
    let start = match matches.value_of("start") {
        Some(start) => parse_point(start)?,
        None => defaults.start,
    };
    let unit = match matches.value_of("units") {
        Some("deg") => AngleUnit::Degrees,
        Some("arc") => AngleUnit::Arc(radius),
        _ => AngleUnit::Radians,
    };

    let input = matches.value_of("input").unwrap_or_default();
    let points = output::read_points(input)?;
    info!("Read {} positions from {:?}", points.len(), input);

    let mut total = 0.0;
    for point in &points {
        total += analysis::geodesic_distance(point, &start, &center, unit)?;
    }
    let mean = if points.is_empty() { 0.0 } else { total / points.len() as f64 };
    let variance = analysis::angular_variance(&points, &start, &center)?;
    println!("positions: {}", points.len());
    println!("mean geodesic distance: {:.6}", mean);
    println!("angular variance (rad^2): {:.6}", variance);
    Ok(())
}

fn start_app() -> Result<()> {
    let matches = cli().get_matches();
    match matches.subcommand() {
        ("walk", Some(matches)) => run_walk(matches),
        ("analyze", Some(matches)) => run_analyze(matches),
        _ => Ok(()),
    }
}

fn main() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(err) = env_logger::Builder::from_env(env).try_init() {
        println!("Could not initialize logger, exiting: {}", err);
    } else if let Err(err) = start_app() {
        error!("{}", err);
        for cause in err.iter().skip(1) {
            error!("Caused by: {}", cause);
        }
        ::std::process::exit(1);
    }
}
