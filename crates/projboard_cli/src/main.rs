//! Terminal driver for the project board.
//!
//! # Responsibility
//! - Boot the board on the in-memory surface and drive it from stdin.
//! - Route every action through the same form submit and drag gestures the
//!   components handle, so the terminal exercises the real event paths.

use log::{debug, error, info};
use projboard_core::{
    init_logging, BoardConfig, MemoryDom, ProjectBoard, ProjectStatus, RenderSurface,
};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::rc::Rc;

const HELP: &str = "\
commands:
  add <title> | <description> | <people>   submit the form
  drag <id-or-prefix> <active|finished>    drag a project onto a list
  list                                     show both lists
  tree                                     show the rendered document
  json                                     print all projects as JSON
  help                                     show this help
  quit                                     exit";

fn main() -> ExitCode {
    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let dom = Rc::new(MemoryDom::with_board_templates());
    let board = match ProjectBoard::bootstrap(dom.clone(), &config) {
        Ok(board) => board,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("failed to start board: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("event=cli_start module=cli status=ok");

    println!("projboard {} (type `help`)", projboard_core::core_version());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("failed to read input: {err}");
                return ExitCode::FAILURE;
            }
        };
        match run_command(&dom, &board, line.trim()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(message) => println!("error: {message}"),
        }
        for alert in dom.take_alerts() {
            println!("alert: {alert}");
        }
        flush_output(&mut stdout);
    }
    ExitCode::SUCCESS
}

/// Flushes pending output. A failure is logged and reported as `false`.
fn flush_output(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(err) => {
            debug!("event=stdout_flush module=cli status=error error={err}");
            false
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

fn run_command(dom: &MemoryDom, board: &ProjectBoard, line: &str) -> Result<Flow, String> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => {}
        "add" => add(dom, board, rest)?,
        "drag" => drag(dom, board, rest)?,
        "list" => print_lists(board),
        "tree" => print!("{}", dom.render_outline()),
        "json" => {
            let json = serde_json::to_string_pretty(&board.state().projects())
                .map_err(|err| err.to_string())?;
            println!("{json}");
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => return Err(format!("unknown command `{other}`; try `help`")),
    }
    Ok(Flow::Continue)
}

fn add(dom: &MemoryDom, board: &ProjectBoard, rest: &str) -> Result<(), String> {
    let mut parts = rest.splitn(3, '|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    let description = parts.next().unwrap_or_default();
    let people = parts.next().unwrap_or_default();

    let input = board.input();
    let fill = || -> Result<(), projboard_core::UiError> {
        dom.set_value(input.title_field(), title)?;
        dom.set_value(input.description_field(), description)?;
        dom.set_value(input.people_field(), people)
    };
    fill().map_err(|err| err.to_string())?;

    let before = board.state().len();
    dom.submit(input.form()).map_err(|err| err.to_string())?;
    if board.state().len() > before {
        if let Some(project) = board.state().projects().last() {
            println!("added {}", project.id);
        }
    }
    Ok(())
}

fn drag(dom: &MemoryDom, board: &ProjectBoard, rest: &str) -> Result<(), String> {
    let (needle, target) = rest
        .trim()
        .split_once(' ')
        .ok_or_else(|| "usage: drag <id-or-prefix> <active|finished>".to_string())?;
    let status = ProjectStatus::parse(target).map_err(|err| err.to_string())?;

    let matches = board
        .state()
        .projects()
        .into_iter()
        .filter(|project| project.id.to_string().starts_with(needle.trim()))
        .collect::<Vec<_>>();
    let project = match matches.as_slice() {
        [project] => project,
        [] => return Err(format!("no project matches `{needle}`")),
        _ => return Err(format!("`{needle}` is ambiguous")),
    };

    let source = dom
        .element_by_id(&project.id.to_string())
        .ok_or_else(|| format!("project {} is not rendered", project.id))?;
    let dropped = dom
        .drag_and_drop(source, board.list(status).element())
        .map_err(|err| err.to_string())?;
    if !dropped {
        return Err("drop was rejected".to_string());
    }
    Ok(())
}

fn print_lists(board: &ProjectBoard) {
    for status in ProjectStatus::ALL {
        println!("{}", status.heading());
        for project in board.state().projects_with_status(status) {
            println!(
                "  {}  {} ({})",
                &project.id.to_string()[..8],
                project.title,
                project.persons_label()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::flush_output;
    use std::io::{self, Write};

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn flush_failure_is_reported_not_raised() {
        assert!(!flush_output(&mut BrokenPipe));
        assert!(flush_output(&mut Vec::<u8>::new()));
    }
}
