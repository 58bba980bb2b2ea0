use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Gen,
    Init,
    Inventory,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Gen(GenArgs),
    Init(InitArgs),
    Inventory(InventoryArgs),
}

#[derive(Debug, Clone)]
pub struct GenArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub model: Option<PathBuf>,
    pub dry_run: bool,
    pub check: bool,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InventoryArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub schemas: Option<Vec<String>>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "gen" => parse_gen(it.map(|s| s.as_str())),
        "init" => parse_init(it.map(|s| s.as_str())),
        "inventory" => parse_inventory(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_gen<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("crudgen.toml");
    let mut database: Option<String> = None;
    let mut model: Option<PathBuf> = None;
    let mut dry_run = false;
    let mut check = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Gen)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                database = Some(token.trim_start_matches("--database=").to_string());
            }
            "--model" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--model requires a value");
                };
                model = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--model=") => {
                model = Some(PathBuf::from(token.trim_start_matches("--model=")));
            }
            "--dry-run" => dry_run = true,
            "--check" => check = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Gen(GenArgs {
        config,
        database,
        model,
        dry_run,
        check,
    }))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("crudgen.toml");

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

fn parse_inventory<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("crudgen.toml");
    let mut database: Option<String> = None;
    let mut schemas: Option<Vec<String>> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Inventory)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                database = Some(token.trim_start_matches("--database=").to_string());
            }
            "--schemas" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--schemas requires a value");
                };
                let parsed = split_csv(v);
                if parsed.is_empty() {
                    anyhow::bail!("--schemas must not be empty");
                }
                schemas = Some(parsed);
            }
            _ if token.starts_with("--schemas=") => {
                let parsed = split_csv(token.trim_start_matches("--schemas="));
                if parsed.is_empty() {
                    anyhow::bail!("--schemas must not be empty");
                }
                schemas = Some(parsed);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Inventory(InventoryArgs {
        config,
        database,
        schemas,
    }))
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
crudgen - CRUD API scaffolding from a reverse-engineered model

USAGE:
  crudgen <COMMAND> [OPTIONS]

COMMANDS:
  init          Create a crudgen.toml template
  gen           Resolve entities against the database and generate CRUD artifacts
  inventory     Refresh the local table/view inventory cache

Run `crudgen <command> --help` for more."
            );
        }
        HelpTopic::Gen => {
            println!(
                "\
USAGE:
  crudgen gen [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: crudgen.toml)
  --database <URL>      Override database.url from config
  --model <FILE>        Override model.source from config
  --dry-run             Print files that would change
  --check               Exit non-zero if output would change
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  crudgen init [OPTIONS]

OPTIONS:
  --config <FILE>       Output config path (default: crudgen.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Inventory => {
            println!(
                "\
USAGE:
  crudgen inventory [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: crudgen.toml)
  --database <URL>      Database URL (overrides config)
  --schemas <CSV>       Comma-separated schema list (default: public)
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gen_with_overrides() {
        let args = vec![
            "crudgen".to_string(),
            "gen".to_string(),
            "--config".to_string(),
            "scaffold.toml".to_string(),
            "--model=Models/AppDbContext.cs".to_string(),
            "--dry-run".to_string(),
        ];

        let cmd = parse_args(&args).unwrap();
        let Command::Gen(gen_args) = cmd else {
            panic!("expected gen");
        };
        assert_eq!(gen_args.config, PathBuf::from("scaffold.toml"));
        assert_eq!(
            gen_args.model,
            Some(PathBuf::from("Models/AppDbContext.cs"))
        );
        assert!(gen_args.dry_run);
        assert!(!gen_args.check);
    }

    #[test]
    fn parse_inventory_schemas_csv() {
        let args = vec![
            "crudgen".to_string(),
            "inventory".to_string(),
            "--schemas=public, sales".to_string(),
        ];

        let cmd = parse_args(&args).unwrap();
        let Command::Inventory(inv) = cmd else {
            panic!("expected inventory");
        };
        assert_eq!(
            inv.schemas,
            Some(vec!["public".to_string(), "sales".to_string()])
        );
    }

    #[test]
    fn rejects_unknown_arguments() {
        let args = vec![
            "crudgen".to_string(),
            "gen".to_string(),
            "--frobnicate".to_string(),
        ];
        assert!(parse_args(&args).is_err());
    }
}
