use console::{Emoji, StyledObject, style};

pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");

/// Severity of a one-line CLI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Info,
    Warn,
    Error,
}

impl Tone {
    fn icon(self) -> Emoji<'static, 'static> {
        match self {
            Tone::Success => Emoji("✅ ", "[ok] "),
            Tone::Info => Emoji("ℹ️  ", "[..] "),
            Tone::Warn => Emoji("⚠️  ", "[!!] "),
            Tone::Error => Emoji("❌ ", "[error] "),
        }
    }

    fn paint(self, msg: &str) -> StyledObject<&str> {
        match self {
            Tone::Success => style(msg).green(),
            Tone::Info => style(msg).blue(),
            Tone::Warn => style(msg).yellow(),
            Tone::Error => style(msg).red().bold(),
        }
    }

    /// Errors go to stderr so `relbot doctor > report.txt` keeps them visible.
    fn to_stderr(self) -> bool {
        self == Tone::Error
    }
}

fn say(tone: Tone, msg: &str) {
    if tone.to_stderr() {
        eprintln!("{}{}", tone.icon(), tone.paint(msg));
    } else {
        println!("{}{}", tone.icon(), tone.paint(msg));
    }
}

pub fn print_success(msg: &str) {
    say(Tone::Success, msg);
}

pub fn print_info(msg: &str) {
    say(Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    say(Tone::Warn, msg);
}

pub fn print_error(msg: &str) {
    say(Tone::Error, msg);
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {}{}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_banner() {
    println!(
        "\n{}{}\n",
        ROCKET,
        style("relbot · release menu & daily digest").bold().cyan()
    );
}

pub fn print_usage_line(command: &str, description: &str) {
    println!("  {:<12} {}", style(command).green(), description);
}
