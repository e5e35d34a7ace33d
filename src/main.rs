// BLE link demo: drives the link machine through a scripted radio session.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use rulechart::link::{self, LinkAgent, LinkEvent, Role, SimulatedRadio};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Central,
    Peripheral,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Script {
    /// Scan, go idle, connect as central, then drop the link.
    Central,
    /// Advertise, accept a peripheral connection, then lose it.
    Peripheral,
    /// Switch between scanning and advertising.
    Switch,
}

#[derive(Debug, Parser)]
#[command(version, about = "Scripted BLE link session on the rulechart engine")]
struct Args {
    /// Print the link rule table as JSON and exit.
    #[arg(long)]
    diagram: bool,

    #[arg(long, value_enum, default_value_t = RoleArg::Central)]
    role: RoleArg,

    #[arg(long, value_enum, default_value_t = Script::Central)]
    script: Script,

    /// Make the simulated radio refuse to advertise.
    #[arg(long)]
    fail_advertising: bool,
}

fn script_events(script: Script) -> &'static [LinkEvent] {
    use LinkEvent::*;
    match script {
        Script::Central => &[ScanComplete, ConnectCommand, CentralConnected, CentralDisconnected],
        Script::Peripheral => &[
            AdvertiseCommand,
            PeripheralConnectionFailed,
            PeripheralConnected,
            PeripheralDisconnected,
        ],
        Script::Switch => &[AdvertiseCommand, ScanCommand, ScanComplete, AdvertiseCommand],
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let role = match args.role {
        RoleArg::Central => Role::Central,
        RoleArg::Peripheral => Role::Peripheral,
    };
    let radio = SimulatedRadio {
        refuse_advertising: args.fail_advertising,
        ..SimulatedRadio::default()
    };
    let mut machine = link::build(role, Box::new(radio))?;

    if args.diagram {
        let edges: Vec<_> = machine.diagram().collect();
        println!("{}", serde_json::to_string_pretty(&edges)?);
        return Ok(());
    }

    link::start(&mut machine)?;
    let (agent, events, mut notices) = LinkAgent::channel(machine, 8);
    let worker = tokio::spawn(agent.run());

    for &event in script_events(args.script) {
        tracing::info!(?event, "posting");
        events.send(event).await?;
    }
    drop(events);

    let machine = worker.await??;
    while let Ok(notice) = notices.try_recv() {
        println!("notice: {notice:?}");
    }
    println!("final state: {:?}", machine.current_state());
    Ok(())
}
