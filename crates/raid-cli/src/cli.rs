//! Command-line argument definitions for the RAID-5 stream CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default size, in bytes, used to create a backing disk file that does
/// not yet exist.
pub const DEFAULT_DISK_SIZE: u64 = 1 << 20;

/// `Cli` defines the root command for the RAID-5 stream binary.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// `Command` enumerates the supported CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Read a range of logical bytes and print them to stdout.
    Read(ReadArgs),
    /// Write bytes from a file (or literal string) at a logical offset.
    Write(WriteArgs),
    /// Mark a disk failed.
    Fail(DiskArgs),
    /// Rebuild and clear the failure bit for a disk.
    Recover(DiskArgs),
    /// Print the array's length, position, and per-disk failure state.
    Status(ArrayArgs),
}

/// `ArrayArgs` identifies the backing disk set and its geometry. Every
/// invocation must repeat these — nothing is persisted on disk.
#[derive(Args, Clone)]
pub struct ArrayArgs {
    /// Directory holding `disk0`, `disk1`, … backing files.
    #[arg(long)]
    pub dir: PathBuf,

    /// Number of disks (N ≥ 3).
    #[arg(long)]
    pub disks: usize,

    /// Stripe unit size in bytes (U > 0).
    #[arg(long)]
    pub stripe_unit: usize,

    /// Size to create a missing backing disk file at.
    #[arg(long, default_value_t = DEFAULT_DISK_SIZE)]
    pub disk_size: u64,
}

/// `ReadArgs` configures a logical read.
#[derive(Args)]
pub struct ReadArgs {
    #[command(flatten)]
    pub array: ArrayArgs,

    /// Logical byte offset to start reading at.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Number of bytes to read.
    #[arg(long)]
    pub length: usize,
}

/// `WriteArgs` configures a logical write.
#[derive(Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub array: ArrayArgs,

    /// Logical byte offset to start writing at.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Literal bytes to write (UTF-8). Mutually exclusive with `--input`.
    #[arg(long, conflicts_with = "input")]
    pub data: Option<String>,

    /// File whose contents are written verbatim. Mutually exclusive with
    /// `--data`.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// `DiskArgs` identifies one disk within an array for fail/recover.
#[derive(Args)]
pub struct DiskArgs {
    #[command(flatten)]
    pub array: ArrayArgs,

    /// Index of the disk to operate on.
    #[arg(long)]
    pub disk: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_read_args() {
        let cli = Cli::parse_from([
            "raid-cli",
            "read",
            "--dir",
            "/tmp/raid",
            "--disks",
            "4",
            "--stripe-unit",
            "256",
            "--offset",
            "512",
            "--length",
            "128",
        ]);

        let Command::Read(args) = cli.command else {
            panic!("expected read command");
        };
        assert_eq!(args.array.disks, 4);
        assert_eq!(args.array.stripe_unit, 256);
        assert_eq!(args.offset, 512);
        assert_eq!(args.length, 128);
        assert_eq!(args.array.disk_size, DEFAULT_DISK_SIZE);
    }

    #[test]
    fn parses_fail_and_recover() {
        let cli = Cli::parse_from([
            "raid-cli", "fail", "--dir", "/tmp/raid", "--disks", "3", "--stripe-unit", "64",
            "--disk", "1",
        ]);
        let Command::Fail(args) = cli.command else {
            panic!("expected fail command");
        };
        assert_eq!(args.disk, 1);

        let cli = Cli::parse_from([
            "raid-cli", "recover", "--dir", "/tmp/raid", "--disks", "3", "--stripe-unit", "64",
            "--disk", "1",
        ]);
        let Command::Recover(args) = cli.command else {
            panic!("expected recover command");
        };
        assert_eq!(args.disk, 1);
    }

    #[test]
    fn write_rejects_data_and_input_together() {
        let result = Cli::try_parse_from([
            "raid-cli",
            "write",
            "--dir",
            "/tmp/raid",
            "--disks",
            "3",
            "--stripe-unit",
            "64",
            "--data",
            "hello",
            "--input",
            "/tmp/payload",
        ]);
        assert!(result.is_err());
    }
}
