use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use subleqvm::dump::{MemoryDump, parse_selectors};
use subleqvm::error::VmError;
use subleqvm::image::Image;
use subleqvm::observer::NullObserver;
use subleqvm::vm::{Vm, VmConfig};

#[derive(Parser)]
#[command(name = "subleqvm", about = "OISC virtual machine executing subleq instructions")]
struct Cli {
    /// Bytecode image to load (JSON produced by an external assembler).
    #[arg(
        value_name = "FILE",
        required_unless_present = "seed",
        conflicts_with = "seed"
    )]
    file: Option<PathBuf>,

    /// Fill memory with a seeded random program instead of loading a file.
    #[arg(long, short = 'S')]
    seed: Option<u64>,

    /// Virtual memory size in words.
    #[arg(long, short = 'm', default_value_t = 16)]
    memsz: usize,

    /// Inter-step delay in seconds (0 means full speed).
    #[arg(long, short = 's', default_value_t = 0.0)]
    speed: f64,

    /// Print a memory dump line before every step.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Comma-separated addresses to dump when --verbose is set
    /// (e.g. 13,14,15).
    #[arg(long, short = 'd', requires = "verbose")]
    dump_fmt: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), VmError> {
    let selectors = cli.dump_fmt.as_deref().map(parse_selectors).transpose()?;

    let mut vm = Vm::new(VmConfig {
        size: cli.memsz,
        delay: cli.speed,
    })?;

    if let Some(path) = &cli.file {
        let image = Image::from_file(path)?;
        vm.load(&image)?;
    } else {
        // Random-fill mode: every cell uniform in [0, N^3), seeded for
        // reproducibility.
        let mut rng = SmallRng::seed_from_u64(cli.seed.unwrap_or_default());
        let bound = (cli.memsz as i64).saturating_pow(3);
        vm.memory_mut().fill_with(|_| rng.gen_range(0..bound));
    }

    if cli.verbose {
        vm.run(&mut MemoryDump::new(selectors))?;
    } else {
        vm.run(&mut NullObserver)?;
    }

    // Distinct from program output, which goes to stdout.
    eprintln!("Halted.");
    Ok(())
}
