use std::fs;
use std::io::Write as _;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{ArrayArgs, Cli, Command};
use raid_rs::{BackingDisk, MmapDisk, Raid5Stream};

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Read(args) => read(args),
        Command::Write(args) => write(args),
        Command::Fail(args) => fail(args),
        Command::Recover(args) => recover(args),
        Command::Status(args) => status(args),
    }
}

fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();
}

fn open_stream(args: &ArrayArgs) -> Result<Raid5Stream> {
    fs::create_dir_all(&args.dir)
        .with_context(|| format!("creating disk directory {}", args.dir.display()))?;

    let mut disks: Vec<Box<dyn BackingDisk>> = Vec::with_capacity(args.disks);
    for i in 0..args.disks {
        let path = args.dir.join(format!("disk{i}"));
        let disk = MmapDisk::open(&path, args.disk_size)
            .with_context(|| format!("opening backing disk {}", path.display()))?;
        disks.push(Box::new(disk));
    }

    Ok(Raid5Stream::new(disks, args.stripe_unit)?)
}

fn read(args: cli::ReadArgs) -> Result<()> {
    let mut stream = open_stream(&args.array)?;
    stream.set_position(args.offset)?;

    let mut buf = vec![0u8; args.length];
    let n = stream.read(&mut buf, 0, args.length)?;
    std::io::stdout().write_all(&buf[..n])?;
    info!(bytes = n, offset = args.offset, "read complete");
    Ok(())
}

fn write(args: cli::WriteArgs) -> Result<()> {
    let payload = match (args.data, args.input) {
        (Some(data), None) => data.into_bytes(),
        (None, Some(path)) => {
            fs::read(&path).with_context(|| format!("reading input file {}", path.display()))?
        }
        _ => return Err(anyhow!("exactly one of --data or --input is required")),
    };

    let mut stream = open_stream(&args.array)?;
    stream.set_position(args.offset)?;
    let n = stream.write(&payload, 0, payload.len())?;
    stream.flush()?;
    info!(bytes = n, offset = args.offset, "write complete");
    Ok(())
}

fn fail(args: cli::DiskArgs) -> Result<()> {
    let mut stream = open_stream(&args.array)?;
    stream.fail_disk(args.disk)?;
    info!(disk = args.disk, "disk marked failed");
    Ok(())
}

fn recover(args: cli::DiskArgs) -> Result<()> {
    let mut stream = open_stream(&args.array)?;
    stream.recover_disk(args.disk)?;
    info!(disk = args.disk, "disk recovered");
    Ok(())
}

fn status(args: cli::ArrayArgs) -> Result<()> {
    let stream = open_stream(&args)?;
    println!("length: {}", stream.length());
    println!("position: {}", stream.position());
    for i in 0..args.disks {
        println!("disk {i}: failed={}", stream.is_disk_failed(i)?);
    }
    Ok(())
}
