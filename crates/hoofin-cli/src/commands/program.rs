use clap::Subcommand;
use hoofin_core::program::{PaceGuide, ProgramLibrary};
use hoofin_core::storage::data_dir;
use hoofin_core::ProgramError;

#[derive(Subcommand)]
pub enum ProgramAction {
    /// List available programs
    List,
    /// Show a program's weekly layout
    Show {
        /// Program name
        name: String,
        /// Include pace descriptions for the interval kinds used
        #[arg(long)]
        paces: bool,
    },
}

pub fn run(action: ProgramAction) -> Result<(), Box<dyn std::error::Error>> {
    let library = ProgramLibrary::open()?;

    match action {
        ProgramAction::List => {
            for name in library.names() {
                println!("{name}");
            }
        }
        ProgramAction::Show { name, paces } => {
            let program = library.lookup(&name).ok_or(ProgramError::NotFound(name))?;

            println!("{}", program.name);
            if !program.description.is_empty() {
                println!("{}", program.description);
            }
            for (wi, week) in program.weeks.iter().enumerate() {
                println!("week {}:", wi + 1);
                for (si, session) in week.sessions.iter().enumerate() {
                    let parts: Vec<String> = session
                        .intervals
                        .iter()
                        .map(|i| format!("{} {:.1}m", i.kind, i.duration))
                        .collect();
                    println!(
                        "  session {}: {} ({}s total)",
                        si + 1,
                        parts.join(", "),
                        session.total_secs()
                    );
                }
            }

            if paces {
                let guide = PaceGuide::load(&data_dir()?.join("paces.json"));
                let mut kinds: Vec<&str> = program
                    .weeks
                    .iter()
                    .flat_map(|w| &w.sessions)
                    .flat_map(|s| &s.intervals)
                    .map(|i| i.kind.as_str())
                    .collect();
                kinds.sort_unstable();
                kinds.dedup();

                println!("paces:");
                for kind in kinds {
                    match guide.lookup(kind) {
                        Some(def) => println!(
                            "  {}: {} (effort {}; {})",
                            def.kind, def.description, def.perceived_effort, def.physical_signs
                        ),
                        None => println!("  {kind}: no pace definition"),
                    }
                }
            }
        }
    }

    Ok(())
}
