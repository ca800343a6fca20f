// Command Palette Module
//
// Lists the shell's commands with their usage, produces the help screen and
// suggests commands when the user types something unrecognized.

#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub usage: String,
    pub description: String,
}

pub struct CommandPalette {
    commands: Vec<Command>,
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPalette {
    /// Creates a new CommandPalette with the shell's commands.
    pub fn new() -> Self {
        let entries = [
            (
                "add",
                ":add nome=.. sobrenome=.. curso=.. [cpf=..] [email=..] [telefone=..] [nascimento=DD/MM/YYYY] [cidade=..] [uf=..]",
                "Register a new student",
            ),
            (
                "update",
                ":update <id> key=value ...",
                "Change fields of an existing student",
            ),
            ("delete", ":delete <id>", "Delete a student"),
            (
                "search",
                ":search [field=Nome|Sobrenome|CPF|Email|Curso|Cidade|UF] [term=..] [sort=<column>] [dir=asc|desc]",
                "Search and sort students",
            ),
            ("list", ":list", "List every student by name"),
            ("help", ":help", "List all available commands"),
            ("quit", ":quit", "Leave the shell"),
        ];
        let commands = entries
            .iter()
            .map(|(name, usage, description)| Command {
                name: name.to_string(),
                usage: usage.to_string(),
                description: description.to_string(),
            })
            .collect();
        CommandPalette { commands }
    }

    /// Searches for commands that contain the given query as a substring (case-insensitive)
    /// and returns the filtered list.
    pub fn filter_commands(&self, query: &str) -> Vec<Command> {
        let q = query.to_lowercase();
        self.commands
            .iter()
            .filter(|cmd| cmd.name.to_lowercase().contains(&q) || cmd.description.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    /// Help screen listing every command with its usage.
    pub fn help_text(&self) -> String {
        let mut text = String::from("Available commands:\n");
        for cmd in &self.commands {
            text.push_str(&format!("  {}\n      {}\n", cmd.usage, cmd.description));
        }
        text.push_str("\nQuote values that contain spaces, e.g. telefone=\"(61) 99999-8888\".\n");
        text
    }
}
