use clap::{Arg, ArgMatches, Command};

use maille::decimation::replay::FaceSet;
use maille::decimation::{decimate_one_level, DecimateOptions, LevelCommands};
use maille::mesh::TriangleMesh;
use maille::obj::{parse_obj, write_obj, write_obja};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{stdout, Write};
use std::path::Path;

fn main() {
    env_logger::init();

    let matches = Command::new("Maille command-line interface")
        .version("0.1")
        .author("Nicolas Silva <nical@fastmail.com>")
        .about("Progressive mesh compressor")
        .subcommand(
            declare_run_params(Command::new("simplify"))
                .about("Compresses an OBJ mesh into a progressive OBJA stream")
                .arg(
                    Arg::new("OUTPUT")
                        .short('o')
                        .long("output")
                        .help("Sets the output file to use")
                        .value_name("FILE")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("SNAPSHOTS")
                        .long("snapshots")
                        .help("Writes an OBJ snapshot of the mesh after each level"),
                ),
        )
        .subcommand(
            declare_run_params(Command::new("verify"))
                .about("Runs the compression in memory and checks the reconstruction"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("simplify", matches)) => simplify(matches),
        Some(("verify", matches)) => verify(matches),
        _ => {
            println!("Try `maille simplify --help`.");
        }
    }
}

fn declare_run_params(command: Command) -> Command {
    command
        .arg(
            Arg::new("INPUT")
                .help("Input OBJ file")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            Arg::new("LEVELS")
                .short('n')
                .long("levels")
                .help("Maximum number of decimation levels (6 by default)")
                .value_name("LEVELS")
                .takes_value(true),
        )
        .arg(
            Arg::new("SEED")
                .short('s')
                .long("seed")
                .help("Seed for the traversal starting points (0 by default)")
                .value_name("SEED")
                .takes_value(true),
        )
        .arg(
            Arg::new("MIN_VERTICES")
                .short('m')
                .long("min-vertices")
                .help("Stops once fewer active vertices remain (10 by default)")
                .value_name("COUNT")
                .takes_value(true),
        )
}

fn load_mesh(matches: &ArgMatches) -> (String, TriangleMesh) {
    let path = matches.value_of("INPUT").unwrap().to_string();
    let source = std::fs::read_to_string(&path).expect("failed to read the input file");
    let mesh = parse_obj(&source).expect("malformed input mesh");
    (path, mesh)
}

fn run_options(matches: &ArgMatches) -> (usize, DecimateOptions) {
    let max_levels = matches
        .value_of("LEVELS")
        .map(|s| s.parse().expect("invalid level count"))
        .unwrap_or(6);
    let mut options = DecimateOptions::DEFAULT;
    if let Some(seed) = matches.value_of("SEED") {
        options.seed = seed.parse().expect("invalid seed");
    }
    if let Some(min) = matches.value_of("MIN_VERTICES") {
        options.min_vertices = min.parse().expect("invalid vertex count");
    }
    (max_levels, options)
}

/// The driver loop of `Decimator::simplify`, unrolled here so that per-level
/// snapshots can be written along the way. The seed chain is the same, so
/// both produce identical streams for a given seed.
fn run_levels(
    mesh: &mut TriangleMesh,
    max_levels: usize,
    options: &DecimateOptions,
    snapshot_stem: Option<&str>,
) -> Vec<LevelCommands> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut levels = Vec::new();
    for index in 0..max_levels {
        if mesh.active_vertex_count() < options.min_vertices {
            break;
        }
        let level = decimate_one_level(mesh, rng.gen()).expect("decimation failed");
        if level.commands.is_empty() {
            break;
        }
        log::info!(
            "level {}: removed {} vertices, {} active left",
            index,
            level.removed.len(),
            mesh.active_vertex_count()
        );
        if let Some(stem) = snapshot_stem {
            let path = format!("{}_{}.obj", stem, index);
            let mut file = File::create(&path).expect("failed to create the snapshot file");
            write_obj(mesh, &mut file).expect("failed to write the snapshot");
        }
        levels.push(level);
    }
    levels
}

fn simplify(matches: &ArgMatches) {
    let (input_path, mut mesh) = load_mesh(matches);
    let (max_levels, options) = run_options(matches);

    let stem = Path::new(&input_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string();
    let snapshot_stem = if matches.is_present("SNAPSHOTS") {
        Some(stem.as_str())
    } else {
        None
    };

    let levels = run_levels(&mut mesh, max_levels, &options, snapshot_stem);

    let mut output: Box<dyn Write> = match matches.value_of("OUTPUT") {
        Some(path) => Box::new(File::create(path).expect("failed to create the output file")),
        None => Box::new(stdout()),
    };
    write_obja(&mesh, &levels, &mut output).expect("failed to write the output");
}

fn verify(matches: &ArgMatches) {
    let (_, mut mesh) = load_mesh(matches);
    let (max_levels, options) = run_options(matches);
    let original = FaceSet::from_mesh(&mesh);

    let levels = run_levels(&mut mesh, max_levels, &options, None);

    let mut replayed = FaceSet::from_mesh(&mesh);
    for level in levels.iter().rev() {
        replayed
            .apply(&level.commands)
            .expect("replaying the command stream failed");
    }

    let removed: usize = levels.iter().map(|level| level.removed.len()).sum();
    println!(
        "{} levels, {} vertices removed, {} faces in the residual mesh",
        levels.len(),
        removed,
        FaceSet::from_mesh(&mesh).num_faces(),
    );
    if replayed == original {
        println!("round trip ok");
    } else {
        eprintln!("round trip mismatch");
        std::process::exit(1);
    }
}
