use std::io::{self, stdout, Stdout, Write};

use crossbeam_channel::Receiver;
use crossterm::{cursor, terminal, ExecutableCommand};

use shared_resources::ElevatorStatus;

const HEADER_SIZE: u16 = 5;

/// Redraws the fleet table every time a new status arrives. Returns once
/// the simulation stops sending.
pub fn main(status_rx: Receiver<Vec<ElevatorStatus>>) -> io::Result<()> {
    let mut stdout = stdout();
    for fleet in status_rx.iter() {
        printstatus(&mut stdout, &fleet)?;
    }
    Ok(())
}

fn printstatus(stdout: &mut Stdout, fleet: &[ElevatorStatus]) -> io::Result<()> {
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(stdout, "+-------+-------+----------+-----------+-------+-------+----------------------+-------+")?;
    writeln!(stdout, "| FLEET                                                                                |")?;
    writeln!(stdout, "+-------+-------+----------+-----------+-------+-------+----------------------+-------+")?;
    writeln!(
        stdout,
        "| {0:<5} | {1:<5} | {2:<8} | {3:<9} | {4:<5} | {5:<5} | {6:<20} | {7:<5} |",
        "CAR", "FLOOR", "STATE", "DIRECTION", "DOORS", "LOAD", "STOPS", "MAINT"
    )?;
    writeln!(stdout, "+-------+-------+----------+-----------+-------+-------+----------------------+-------+")?;
    for car in fleet {
        writeln!(
            stdout,
            "| {0:<5} | {1:<5} | {2:<8} | {3:<9} | {4:<5} | {5:<5} | {6:<20} | {7:<5} |",
            car.id,
            car.current_floor,
            car.behaviour.as_string(),
            car.direction.as_string().unwrap_or_else(|| String::from("-")),
            if car.door_open { "open" } else { "shut" },
            format!("{}/{}", car.current_load, car.capacity),
            format!("{:?}", car.destination_floors),
            if car.maintenance { "yes" } else { "no" },
        )?;
        writeln!(stdout, "+-------+-------+----------+-----------+-------+-------+----------------------+-------+")?;
    }

    stdout.execute(cursor::MoveUp(HEADER_SIZE + 2 * fleet.len() as u16))?;
    Ok(())
}
