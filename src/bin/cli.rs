//! Bandit Ops CLI
//!
//! Interactive REPL that talks directly to the State Store and Registry,
//! bypassing the HTTP surface — for inspecting or nudging an experiment by
//! hand during an incident or a manual test run.

use banditsvc::config::Config;
use banditsvc::posterior::PosteriorEngine;
use banditsvc::registry::{self, Registry};
use banditsvc::store::{self, PosteriorStore};
use rand::thread_rng;
use std::io::Write;
use std::sync::Arc;
use tokio_postgres::Client;

#[tokio::main]
async fn main() {
    banditsvc::init_logging();
    let config = Config::from_env();
    let store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;
    CLI::new(store, registry, config).run().await;
}

struct CLI {
    store: redis::aio::ConnectionManager,
    registry: Arc<Client>,
    config: Config,
}

impl CLI {
    fn new(store: redis::aio::ConnectionManager, registry: Arc<Client>, config: Config) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    async fn run(&self) {
        loop {
            let ref mut input = String::new();
            print!("> ");
            std::io::stdout().flush().unwrap();
            std::io::stdin().read_line(input).unwrap();
            match input.trim() {
                "quit" => break,
                "exit" => break,
                _ => match self.handle(input).await {
                    Err(e) => eprintln!("handle error: {}", e),
                    Ok(_) => continue,
                },
            }
        }
    }

    async fn handle(&self, input: &str) -> Result<(), Box<dyn std::error::Error>> {
        let args = input.split_whitespace().collect::<Vec<&str>>();
        match args.first().copied() {
            Some("create") => {
                let id = args.get(1).ok_or("usage: create <id> <n_arms>")?;
                let n_arms: i32 = args.get(2).ok_or("usage: create <id> <n_arms>")?.parse()?;
                self.registry.create(id, n_arms).await?;
                self.store.clone().seed(id, n_arms as usize).await?;
                println!("created {id} with {n_arms} arms");
            }
            Some("select") => {
                let id = args.get(1).ok_or("usage: select <id>")?;
                let mut store = self.store.clone();
                let n_arms = store.get_n_arms(id).await?;
                let (alphas, betas) = store.read_posteriors(id, n_arms).await?;
                let mut rng = thread_rng();
                let (arm_id, p_best) =
                    PosteriorEngine::thompson_sample(&mut rng, &alphas, &betas, self.config.m_hot);
                println!("arm_id={arm_id} p_best={p_best:.4}");
            }
            Some("reward") => {
                let id = args.get(1).ok_or("usage: reward <id> <arm_id> <reward>")?;
                let arm_id: usize = args
                    .get(2)
                    .ok_or("usage: reward <id> <arm_id> <reward>")?
                    .parse()?;
                let reward: f64 = args
                    .get(3)
                    .ok_or("usage: reward <id> <arm_id> <reward>")?
                    .parse()?;
                self.store
                    .clone()
                    .apply_reward(id, arm_id, reward > 0.0)
                    .await?;
                println!("recorded reward={reward} for arm {arm_id}");
            }
            Some("p-best") => {
                let id = args.get(1).ok_or("usage: p-best <id>")?;
                let mut store = self.store.clone();
                let n_arms = store.get_n_arms(id).await?;
                let (alphas, betas) = store.read_posteriors(id, n_arms).await?;
                let mut rng = thread_rng();
                let p_best =
                    PosteriorEngine::p_best_all(&mut rng, &alphas, &betas, self.config.m_stop);
                for (arm_id, p) in p_best.iter().enumerate() {
                    println!("  arm {arm_id}: {p:.4}");
                }
            }
            Some("status") => {
                let id = args.get(1).ok_or("usage: status <id>")?;
                match self.registry.get(id).await? {
                    Some(experiment) => println!("{experiment:#?}"),
                    None => println!("no such experiment"),
                }
            }
            Some("help") => {
                println!("available commands:");
                println!("  create <id> <n_arms>          - register a new experiment");
                println!("  select <id>                   - draw a Thompson sample");
                println!("  reward <id> <arm_id> <reward> - record an observed reward");
                println!("  p-best <id>                   - posterior P(best) per arm");
                println!("  status <id>                   - registry row for an experiment");
                println!("  help                          - show this help");
                println!("  exit/quit                     - exit the program");
            }
            _ => println!("unknown command. type 'help' for usage."),
        }
        Ok(())
    }
}
