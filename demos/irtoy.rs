use std::process;
use std::time::Duration;

use log::Level;
use pretty_hex::*;

use structopt::StructOpt;

use irtoy::serial::{SerialChannel, DEFAULT_BAUD_RATE};
use irtoy::{Config, IrToy};

#[derive(StructOpt, Debug)]
#[structopt(name = "irtoy")]
struct Opt {
    /// Serial device the IR Toy is attached to
    #[structopt(short, long, default_value = "/dev/ttyACM0")]
    port: String,

    /// Baud rate to open the serial device with
    #[structopt(short, long, default_value = "115200")]
    baud: u32,

    /// Pause between protocol steps, in milliseconds
    #[structopt(long, default_value = "50")]
    settle_ms: u64,

    /// Turn on debugging
    #[structopt(short, long)]
    debug: bool,

    /// Turn on verbose messages
    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(StructOpt, Debug)]
enum Cmd {
    /// Print the hardware and firmware version
    Version,
    /// Wait for a signal and print it as hex
    Record,
    /// Transmit a signal given as hex, e.g. the output of `record`
    Replay { code: String },
}

fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if !text.is_ascii() || text.len() % 2 != 0 {
        return Err(format!("expected an even number of hex digits, got {:?}", text));
    }
    (0..text.len())
        .step_by(2)
        .map(|idx| {
            u8::from_str_radix(&text[idx..idx + 2], 16)
                .map_err(|e| format!("bad hex at offset {}: {}", idx, e))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn run(opt: &Opt) -> Result<(), String> {
    let mut channel = SerialChannel::open(&opt.port, opt.baud).map_err(|e| e.to_string())?;
    let config = Config::new().with_settle_time(Duration::from_millis(opt.settle_ms));
    let mut toy = IrToy::with_config(&mut channel, config).map_err(|e| e.to_string())?;

    match &opt.cmd {
        Cmd::Version => {
            let info = toy.firmware_revision().map_err(|e| e.to_string())?;
            println!("{}", info);
            toy.enter_sampling_mode().map_err(|e| e.to_string())?;
        }
        Cmd::Record => {
            println!("Waiting for a signal on {} ...", opt.port);
            let code = toy.receive().map_err(|e| e.to_string())?;
            if opt.verbose {
                println!("{:?}", code.hex_dump());
            }
            println!("{}", to_hex(&code));
        }
        Cmd::Replay { code } => {
            let code = parse_hex(code)?;
            let report = toy.transmit(&code).map_err(|e| e.to_string())?;
            println!("Sent {}", report);
        }
    }
    Ok(())
}

fn main() {
    let opt = Opt::from_args();

    let level = if opt.debug { Level::Debug } else { Level::Info };
    simple_logger::init_with_level(level).unwrap();

    if opt.verbose {
        println!("{:#?}", opt);
    }
    if opt.baud != DEFAULT_BAUD_RATE {
        log::warn!("The IR Toy ignores the baud rate, using {} anyway", opt.baud);
    }

    if let Err(e) = run(&opt) {
        println!("Error: {}", e);
        process::exit(1);
    }
}
