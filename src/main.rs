/*!
 * procmgr - Main Entry Point
 *
 * Menu-driven front end over the core containers:
 * - Process manager (registry)
 * - CPU scheduler (ready queue)
 * - Memory manager (block stack)
 *
 * Owns all prompting and input sanitization; core operations never
 * re-prompt, exit, or abort.
 */

use anyhow::{bail, Result};
use log::warn;
use procmgr::System;
use std::env;
use std::io::{self, Write};
use std::path::Path;

/// Default snapshot location, overridable via PROCMGR_STATE_PATH
const DEFAULT_STATE_PATH: &str = "process_state.dat";

fn main() -> Result<()> {
    env_logger::init();

    let state_path =
        env::var("PROCMGR_STATE_PATH").unwrap_or_else(|_| DEFAULT_STATE_PATH.to_string());
    let json_listing = env::var("PROCMGR_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let mut system = if Path::new(&state_path).exists() {
        println!("Loading system state...");
        match System::load_from_path(&state_path) {
            Ok(system) => {
                println!("State loaded from {}.\n", state_path);
                system
            }
            Err(err) => {
                warn!("Snapshot unreadable, starting empty: {}", err);
                println!("Snapshot could not be read; starting empty.\n");
                System::new()
            }
        }
    } else {
        System::new()
    };

    loop {
        println!("\n=== PROCESS MANAGEMENT SYSTEM ===");
        println!("1. Process manager");
        println!("2. CPU scheduler");
        println!("3. Memory manager");
        println!("4. Save and exit");
        println!("=================================");
        match prompt_u32("Option: ", 1, 4)? {
            1 => process_menu(&mut system, json_listing)?,
            2 => scheduler_menu(&mut system, json_listing)?,
            3 => memory_menu(&mut system, json_listing)?,
            _ => {
                println!("\nSaving...");
                match system.save_to_path(&state_path) {
                    Ok(()) => println!("State saved to {}.", state_path),
                    Err(err) => println!("Save failed: {}", err),
                }
                println!("System closed.");
                return Ok(());
            }
        }
    }
}

fn process_menu(system: &mut System, json_listing: bool) -> Result<()> {
    loop {
        println!("\n[1] Add\n[2] Remove\n[3] Set priority\n[4] List\n[5] Back");
        match prompt_u32("Option: ", 1, 5)? {
            1 => {
                let name = prompt_name("Name: ")?;
                let priority = prompt_u32("Priority (1-5): ", 1, 5)? as u8;
                match system.create(name.clone(), priority) {
                    Ok(pid) => println!("Process '{}' (PID {}) created.", name, pid),
                    Err(err) => println!("{}", err),
                }
            }
            2 => {
                let pid = prompt_u32("PID to remove: ", 1, u32::MAX)?;
                match system.terminate(pid) {
                    Ok(()) => println!("Process PID {} removed.", pid),
                    Err(err) => println!("{}", err),
                }
            }
            3 => {
                let pid = prompt_u32("PID: ", 1, u32::MAX)?;
                if !system.registry.exists(pid) {
                    println!("Process {} not found.", pid);
                    continue;
                }
                let priority = prompt_u32("New priority (1-5): ", 1, 5)? as u8;
                match system.registry.set_priority(pid, priority) {
                    Ok(()) => println!("Priority updated to {}.", priority),
                    Err(err) => println!("{}", err),
                }
            }
            4 => show_processes(system, json_listing),
            _ => return Ok(()),
        }
    }
}

fn scheduler_menu(system: &mut System, json_listing: bool) -> Result<()> {
    loop {
        println!("\n[1] Admit\n[2] Dispatch\n[3] Show queue\n[4] Back");
        match prompt_u32("Option: ", 1, 4)? {
            1 => {
                show_processes(system, json_listing);
                let pid = prompt_u32("Process PID: ", 1, u32::MAX)?;
                match system.admit(pid) {
                    Ok(()) => println!("'{}' admitted to CPU queue.", system.registry.name_of(pid)),
                    Err(err) => println!("{}", err),
                }
            }
            2 => match system.dispatch() {
                Ok(pid) => println!("Executed: {} (PID {})", system.registry.name_of(pid), pid),
                Err(err) => println!("{}", err),
            },
            3 => show_queue(system),
            _ => return Ok(()),
        }
    }
}

fn memory_menu(system: &mut System, json_listing: bool) -> Result<()> {
    loop {
        println!("\n[1] Assign\n[2] Free\n[3] Status\n[4] Back");
        match prompt_u32("Option: ", 1, 4)? {
            1 => {
                show_processes(system, json_listing);
                let pid = prompt_u32("Process PID: ", 1, u32::MAX)?;
                match system.assign_block(pid) {
                    Ok(usage) => println!(
                        "Memory assigned to '{}'. ({}/{})",
                        system.registry.name_of(pid),
                        usage.used,
                        usage.capacity
                    ),
                    Err(err) => println!("{}", err),
                }
            }
            2 => match system.free_block() {
                Ok(pid) => {
                    let usage = system.stack.usage();
                    println!(
                        "Memory freed from '{}'. Free blocks: {}",
                        system.registry.name_of(pid),
                        usage.capacity.saturating_sub(usage.used)
                    );
                }
                Err(err) => println!("{}", err),
            },
            3 => show_memory(system),
            _ => return Ok(()),
        }
    }
}

fn show_processes(system: &System, json_listing: bool) {
    if system.registry.is_empty() {
        println!("No processes.");
        return;
    }
    if json_listing {
        match serde_json::to_string_pretty(system.processes()) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Could not render process table: {}", err),
        }
        return;
    }
    println!("\n--- PROCESSES ---");
    for proc in system.processes() {
        println!(
            "PID: {} | Name: {} | Priority: {} | State: {}",
            proc.pid,
            proc.name,
            proc.priority,
            proc.state_label()
        );
    }
    println!("-----------------");
}

fn show_queue(system: &System) {
    let queued = system.queue.snapshot();
    if queued.is_empty() {
        println!("CPU queue empty.");
        return;
    }
    println!("\n--- CPU QUEUE ---");
    for (pos, pid) in queued.iter().enumerate() {
        println!(
            "{}. {} (PID {}, priority {})",
            pos + 1,
            system.registry.name_of(*pid),
            pid,
            system.registry.priority_of(*pid)
        );
    }
    println!("-----------------");
}

fn show_memory(system: &System) {
    let usage = system.stack.usage();
    println!("\n--- MEMORY ---");
    println!("Used: {} / {}", usage.used, usage.capacity);
    let blocks = system.stack.snapshot();
    if !blocks.is_empty() {
        println!("Blocks (LIFO):");
        for (pos, pid) in blocks.iter().enumerate() {
            println!("{}. {} (PID {})", pos + 1, system.registry.name_of(*pid), pid);
        }
    }
    println!("--------------");
}

/// Prompt until a whole number inside [min, max] is entered
fn prompt_u32(msg: &str, min: u32, max: u32) -> Result<u32> {
    loop {
        match prompt_line(msg)?.parse::<u32>() {
            Ok(v) if (min..=max).contains(&v) => return Ok(v),
            _ => println!("Invalid value. Try again."),
        }
    }
}

/// Prompt until a non-empty string is entered; surrounding whitespace is
/// stripped
fn prompt_name(msg: &str) -> Result<String> {
    loop {
        let name = prompt_line(msg)?;
        if !name.is_empty() {
            return Ok(name);
        }
        println!("Name cannot be empty.");
    }
}

fn prompt_line(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        bail!("input stream closed");
    }
    Ok(input.trim().to_string())
}
