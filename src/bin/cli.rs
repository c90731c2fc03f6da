use critical_path_tool::{
    AnalyzerConfig, CriticalPathAnalyzer, ProjectAnalysis, ProjectTasks, load_project_from_json,
    load_tasks_from_csv, logging, report, save_critical_tasks_to_csv, save_project_to_json,
};
use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use std::io::{self, Write};

fn format_cell(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Widths in chars; `{:<width$}` pads by chars as well.
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(av) = col.get(row_idx) {
                widths[ci] = widths[ci].max(format_cell(&av).chars().count());
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", name, width = widths[i]));
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = col.get(row_idx).map(|av| format_cell(&av)).unwrap_or_default();
            out.push_str(&format!(" {:<width$} |", s, width = widths[ci]));
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_frame(frame: PolarsResult<DataFrame>) {
    match frame {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Report error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  project <key> [name...]            Set the current project key and display name\n  load <json|csv> <path>             Load tasks (json snapshot or task array, csv task rows)\n  show                               Show current tasks\n  compute                            Build the event network and solve the critical path\n  events                             Show event times (ve, vl, slack)\n  activities                         Show activities with earliest/latest start\n  paths                              List critical paths\n  critical                           Show critical tasks\n  save <json|csv> <path>             Save annotated tasks (json) or critical tasks (csv)\n  quit|exit                          Exit"
    );
}

fn with_analysis(analysis: &Option<ProjectAnalysis>, f: impl FnOnce(&ProjectAnalysis)) {
    match analysis {
        Some(analysis) => f(analysis),
        None => println!("Nothing computed yet. Run 'compute' first."),
    }
}

fn main() {
    let config = match AnalyzerConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}; using defaults");
            AnalyzerConfig::default()
        }
    };
    if let Err(e) = logging::init_tracing(config.log_filter.as_deref()) {
        eprintln!("Logging disabled: {e}");
    }

    let analyzer = CriticalPathAnalyzer::from_config(&config);
    let mut project = ProjectTasks::new("PROJECT", Vec::new());
    let mut analysis: Option<ProjectAnalysis> = None;

    println!("Critical Path Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "project" => match parts.next() {
                Some(key) => {
                    let name = parts.collect::<Vec<_>>().join(" ");
                    project.project_key = key.to_string();
                    project.project_name = (!name.is_empty()).then_some(name);
                    analysis = None;
                    let metadata = project.metadata();
                    println!(
                        "Project set: {} ({})",
                        metadata.project_key, metadata.project_name
                    );
                }
                None => println!("Usage: project <key> [name...]"),
            },
            "load" => {
                let kind = parts.next();
                let path = parts.next();
                match (kind, path) {
                    (Some("json"), Some(path)) => {
                        match load_project_from_json(path, &project.project_key) {
                            Ok(loaded) => {
                                project = loaded;
                                analysis = None;
                                println!(
                                    "Loaded {} tasks for {}.",
                                    project.tasks.len(),
                                    project.project_key
                                );
                            }
                            Err(e) => println!("Load error: {}", e),
                        }
                    }
                    (Some("csv"), Some(path)) => match load_tasks_from_csv(path) {
                        Ok(tasks) => {
                            project.tasks = tasks;
                            analysis = None;
                            println!(
                                "Loaded {} tasks for {}.",
                                project.tasks.len(),
                                project.project_key
                            );
                        }
                        Err(e) => println!("Load error: {}", e),
                    },
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            "show" => print_frame(report::tasks_frame(&project.tasks)),
            "compute" => {
                let result = analyzer.analyze_project(&mut project);
                println!("Computed ({})", result.summary().to_cli_summary());
                analysis = Some(result);
            }
            "events" => with_analysis(&analysis, |a| print_frame(report::events_frame(a))),
            "activities" => {
                with_analysis(&analysis, |a| print_frame(report::activities_frame(a)))
            }
            "paths" => with_analysis(&analysis, |a| {
                if a.critical_paths().is_empty() {
                    println!("No critical paths ({}).", a.status());
                }
                for (i, path) in a.critical_paths().iter().enumerate() {
                    println!("{:>3}: {}", i + 1, path.join(" -> "));
                }
            }),
            "critical" => {
                with_analysis(&analysis, |a| print_frame(report::tasks_frame(a.critical_tasks())))
            }
            "save" => {
                let kind = parts.next();
                let path = parts.next();
                match (kind, path) {
                    (Some("json"), Some(path)) => match save_project_to_json(&project, path) {
                        Ok(()) => println!("Saved tasks to {}.", path),
                        Err(e) => println!("Save error: {}", e),
                    },
                    (Some("csv"), Some(path)) => with_analysis(&analysis, |a| {
                        match save_critical_tasks_to_csv(&a.outcome(), path) {
                            Ok(()) => println!("Saved critical tasks to {}.", path),
                            Err(e) => println!("Save error: {}", e),
                        }
                    }),
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            _ => println!("Unknown command '{}'. Type 'help'.", cmd),
        }
    }
}
