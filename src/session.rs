use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::model::FilterUpdate;
use crate::output;
use crate::view::ViewController;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
## Commands
- `search <term>`: search titles and descriptions (no term clears the search)
- `filter key=value ...`: keys are min, max, category, brand, color, size (`key=` clears)
- `reset`: clear all filters
- `page <n>`, `next`, `prev`: move between pages
- `open <id>`: show product details
- `close`: close the detail view
- `categories`: list categories
- `filters`: show the active search and filters
- `retry`: reload everything from scratch
- `quit`: exit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Filter(FilterUpdate),
    Reset,
    Page(usize),
    Next,
    Prev,
    Open(u64),
    Close,
    Categories,
    Filters,
    Retry,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CatalogError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "filter" | "f" => Command::Filter(parse_filter_update(rest)?),
        "reset" => Command::Reset,
        "page" | "p" => Command::Page(parse_number(rest, "page number")?),
        "next" | "n" => Command::Next,
        "prev" => Command::Prev,
        "open" | "o" => Command::Open(parse_number(rest, "product id")?),
        "close" | "c" => Command::Close,
        "categories" => Command::Categories,
        "filters" => Command::Filters,
        "retry" => Command::Retry,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "" => return Err(CatalogError::Command("empty command".to_string())),
        other => {
            return Err(CatalogError::Command(format!(
                "unknown command '{}', type `help` for a list",
                other
            )))
        }
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CatalogError> {
    raw.parse()
        .map_err(|_| CatalogError::Command(format!("expected a {}, got '{}'", what, raw)))
}

/// Parse `key=value` pairs. Values may contain spaces when quoted:
/// `category="men's clothing"`.
pub fn parse_filter_update(input: &str) -> Result<FilterUpdate, CatalogError> {
    let mut update = FilterUpdate::default();

    for (key, value) in split_pairs(input)? {
        match key.to_ascii_lowercase().as_str() {
            "min" | "min_price" => update.min_price = Some(parse_price(&value)?),
            "max" | "max_price" => update.max_price = Some(parse_price(&value)?),
            "category" => update.category = Some(value),
            "brand" => update.brand = Some(value),
            "color" => update.color = Some(value),
            "size" => update.size = Some(value),
            other => {
                return Err(CatalogError::Command(format!(
                    "unknown filter '{}'. Use min, max, category, brand, color or size",
                    other
                )))
            }
        }
    }

    if update.is_empty() {
        return Err(CatalogError::Command(
            "filter needs at least one key=value pair".to_string(),
        ));
    }
    Ok(update)
}

fn parse_price(raw: &str) -> Result<f64, CatalogError> {
    let price: f64 = parse_number(raw, "price")?;
    if !price.is_finite() {
        return Err(CatalogError::Command(format!("invalid price '{}'", raw)));
    }
    Ok(price)
}

fn split_pairs(input: &str) -> Result<Vec<(String, String)>, CatalogError> {
    let mut pairs = Vec::new();
    let mut chars = input.trim().chars().peekable();

    while chars.peek().is_some() {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let key: String = std::iter::from_fn(|| chars.next_if(|c| *c != '=' && !c.is_whitespace()))
            .collect();
        if chars.next() != Some('=') {
            return Err(CatalogError::Command(format!(
                "expected key=value, got '{}'",
                key
            )));
        }

        let value = if chars.next_if_eq(&'"').is_some() {
            let value: String = std::iter::from_fn(|| chars.next_if(|c| *c != '"')).collect();
            if chars.next() != Some('"') {
                return Err(CatalogError::Command(format!(
                    "unterminated quote in '{}'",
                    key
                )));
            }
            value
        } else {
            std::iter::from_fn(|| chars.next_if(|c| !c.is_whitespace())).collect()
        };

        pairs.push((key, value));
    }

    Ok(pairs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive browsing session. Acts as the top-level error boundary: any
/// fault while handling or rendering a command drops the session into a
/// fallback screen until the user retries.
pub struct Session<W: Write> {
    client: CatalogClient,
    page_size: usize,
    view: ViewController,
    out: W,
    faulted: bool,
}

impl<W: Write> Session<W> {
    pub fn new(client: CatalogClient, page_size: usize, out: W) -> Self {
        let view = ViewController::new(client.clone(), page_size);
        Self {
            client,
            page_size,
            view,
            out,
            faulted: false,
        }
    }

    pub async fn start(&mut self) {
        self.view.mount().await;
        self.render_guarded();
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                self.write_guarded(&format!("{}\n", e));
                return Flow::Continue;
            }
        };

        if self.faulted && !matches!(command, Command::Retry | Command::Quit | Command::Help) {
            self.write_guarded(&output::format_fallback_screen());
            return Flow::Continue;
        }

        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.write_guarded(HELP);
                return Flow::Continue;
            }
            Command::Categories => {
                let text = output::format_categories(self.view.categories());
                self.write_guarded(&text);
                return Flow::Continue;
            }
            Command::Filters => {
                let text = output::format_filters(
                    self.view.search_term(),
                    self.view.filters(),
                    self.view.current_page(),
                );
                self.write_guarded(&text);
                return Flow::Continue;
            }
            Command::Retry => {
                tracing::info!("Restarting session from a clean state");
                self.faulted = false;
                self.view = ViewController::new(self.client.clone(), self.page_size);
                self.view.mount().await;
            }
            Command::Search(term) => self.view.set_search_term(&term).await,
            Command::Filter(update) => self.view.update_filters(update).await,
            Command::Reset => self.view.reset_filters().await,
            Command::Page(n) => self.view.go_to_page(n),
            Command::Next => self.view.next_page(),
            Command::Prev => self.view.prev_page(),
            Command::Open(id) => self.view.select(id).await,
            Command::Close => self.view.close_detail(),
        }

        tracing::debug!("{} products in view", self.view.products().len());
        self.render_guarded();
        Flow::Continue
    }

    #[cfg(test)]
    pub fn view(&self) -> &ViewController {
        &self.view
    }

    #[cfg(test)]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn render_guarded(&mut self) {
        let text = output::format_view(&self.view);
        self.write_guarded(&text);
    }

    fn write_guarded(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::error!("Failed to render view: {}", e);
            self.faulted = true;
            // Best effort: the fallback goes to stderr since stdout just failed
            eprint!("{}", output::format_fallback_screen());
        }
    }
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(client: CatalogClient, page_size: usize) -> Result<(), CatalogError> {
    let mut session = Session::new(client, page_size, std::io::stdout());
    session.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if session.handle_line(&line).await == Flow::Quit {
            break;
        }
    }
    Ok(())
}
