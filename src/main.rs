// Drives several in-process replicas through random concurrent edits and
// random, reordered delivery, then checks that they all converged.

mod sim_types;

use anyhow::{bail, Result};
use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use sim_types::{ActorType, SimLogOpMove, SimOpMove, SimReplica, SimState, SimTree, TreeIdType};
use sn_tree::{has_unique_parents, is_acyclic, wire, OpMove};

#[derive(Parser, Debug)]
#[command(version, about = "Convergence simulator for the replicated move tree")]
struct Args {
    /// Number of replicas.
    #[arg(long, default_value_t = 3)]
    replicas: usize,

    /// Number of simulation steps (local edits or deliveries).
    #[arg(long, default_value_t = 200)]
    steps: usize,

    /// Seed for the random number generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Print every node's path once the replicas have converged.
    #[arg(long)]
    print_tree: bool,
}

struct InoMerge;

impl InoMerge {
    // actor ids must fit in the 16 bits above the counter.
    const MAX_ACTOR: u64 = 0xFFFF;

    pub fn combine(a: u64, b: u64) -> u64 {
        a << 48 | b
    }
}

struct Peer {
    replica: SimReplica,
    // encoded messages not yet delivered to this peer.
    inbox: Vec<String>,
}

struct Simulation {
    peers: Vec<Peer>,
    rng: StdRng,
    authored: usize,
}

impl Simulation {
    const ROOT: TreeIdType = 1;
    const TRASH: TreeIdType = 2;

    fn new(replicas: usize, seed: u64) -> Self {
        let peers = (1..=replicas as ActorType)
            .map(|actor| Peer {
                replica: SimReplica::with_actor(actor),
                inbox: Vec::new(),
            })
            .collect();
        Self {
            peers,
            rng: StdRng::seed_from_u64(seed),
            authored: 0,
        }
    }

    fn bootstrap(&mut self) -> Result<()> {
        let replica = &mut self.peers[0].replica;
        let ops = vec![
            replica.opmove(None, "root".to_string(), Self::ROOT),
            replica.opmove(None, "trash".to_string(), Self::TRASH),
        ];
        for op in ops {
            self.publish(0, op)?;
        }
        Ok(())
    }

    // nodes under root, root included.
    fn live_nodes(tree: &SimTree) -> Vec<TreeIdType> {
        tree.iter()
            .map(|(id, _)| *id)
            .filter(|id| *id == Self::ROOT || tree.is_ancestor(&Self::ROOT, id))
            .collect()
    }

    fn random_name(&mut self) -> String {
        format!("d{}", self.rng.gen_range(0..100))
    }

    fn author(&mut self, idx: usize) -> Option<SimOpMove> {
        let live = Self::live_nodes(self.peers[idx].replica.tree());
        let target = *live.choose(&mut self.rng)?;
        let movable: Vec<TreeIdType> = live.iter().copied().filter(|id| *id != Self::ROOT).collect();
        let name = self.random_name();
        let choice = if movable.is_empty() { 0 } else { self.rng.gen_range(0..4) };

        let replica = &mut self.peers[idx].replica;
        let op = match choice {
            // mkdir
            0 => {
                let ts = replica.tick();
                let child = InoMerge::combine(*ts.actor_id(), ts.counter());
                OpMove::new(ts, Some(target), name, child)
            }
            // mv, possibly under one of its own descendants.
            1 => {
                let node = *movable.choose(&mut self.rng)?;
                let meta = replica.tree().find(&node)?.metadata().clone();
                replica.opmove(Some(target), meta, node)
            }
            // rename in place.
            2 => {
                let node = *movable.choose(&mut self.rng)?;
                let parent = replica.tree().parent_of(&node).map(|(p, _)| *p);
                replica.opmove(parent, name, node)
            }
            // rm
            _ => {
                let node = *movable.choose(&mut self.rng)?;
                let meta = replica.tree().find(&node)?.metadata().clone();
                replica.opmove(Some(Self::TRASH), meta, node)
            }
        };
        Some(op)
    }

    // Applies `op` on its author and queues its log record for every other peer.
    fn publish(&mut self, from: usize, op: SimOpMove) -> Result<()> {
        let ts = op.timestamp().clone();
        let replica = &mut self.peers[from].replica;
        replica.apply_op(op);

        let logged: Vec<SimLogOpMove> = replica
            .state()
            .log()
            .iter()
            .filter(|l| *l.timestamp() == ts)
            .cloned()
            .collect();
        let msg = wire::encode_ops(&logged)?;

        for (idx, peer) in self.peers.iter_mut().enumerate() {
            if idx != from {
                peer.inbox.push(msg.clone());
            }
        }
        self.authored += 1;
        Ok(())
    }

    // Delivers a random, shuffled part of a peer's inbox.
    fn deliver(&mut self, idx: usize, all: bool) -> Result<()> {
        let rng = &mut self.rng;
        let peer = &mut self.peers[idx];
        peer.inbox.shuffle(&mut *rng);
        let keep = if all {
            0
        } else {
            rng.gen_range(0..=peer.inbox.len())
        };
        let batch = peer.inbox.split_off(keep);

        debug!(
            "delivering {} messages to replica {}",
            batch.len(),
            peer.replica.actor_id()
        );
        for msg in batch {
            let ops: Vec<SimLogOpMove> = wire::decode_ops(&msg)?;
            peer.replica.apply_log_ops(&ops);
        }
        Ok(())
    }

    fn run(&mut self, steps: usize) -> Result<()> {
        self.bootstrap()?;

        for _ in 0..steps {
            let idx = self.rng.gen_range(0..self.peers.len());
            if self.rng.gen_bool(0.6) {
                if let Some(op) = self.author(idx) {
                    self.publish(idx, op)?;
                }
            } else {
                self.deliver(idx, false)?;
            }
        }

        for idx in 0..self.peers.len() {
            self.deliver(idx, true)?;
        }
        Ok(())
    }

    fn verify(&self) -> Result<&SimState> {
        let reference = self.peers[0].replica.state();

        for peer in &self.peers[1..] {
            if peer.replica.state() != reference {
                bail!(
                    "replica {} diverged from replica {}",
                    peer.replica.actor_id(),
                    self.peers[0].replica.actor_id()
                );
            }
        }
        if !has_unique_parents(reference.tree()) {
            bail!("tree has an entry keyed by the wrong child");
        }
        if !is_acyclic(reference.tree()) {
            bail!("tree contains a cycle");
        }
        if SimState::from_log(reference.log().to_vec()) != *reference {
            bail!("tree does not match a replay of its log");
        }
        Ok(reference)
    }
}

fn display_path(tree: &SimTree, id: &TreeIdType) -> Result<String> {
    let node = tree.require(id)?;
    let mut names = tree
        .path_to_root(id)
        .iter()
        .map(|a| tree.require(a).map(|n| n.metadata().as_str()))
        .collect::<sn_tree::Result<Vec<&str>>>()?;
    names.reverse();
    names.push(node.metadata());
    Ok(format!("/{}", names.join("/")))
}

fn check_args(args: &Args) -> Result<()> {
    if args.replicas == 0 {
        bail!("at least one replica is required");
    }
    if args.replicas > InoMerge::MAX_ACTOR as usize {
        bail!("at most {} replicas are supported", InoMerge::MAX_ACTOR);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let args = Args::parse();

    check_args(&args)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("simulating {} replicas, seed {}", args.replicas, seed);

    let mut sim = Simulation::new(args.replicas, seed);
    sim.run(args.steps)?;
    let state = sim.verify()?;

    println!(
        "converged: {} replicas, {} moves, {} nodes (seed {})",
        args.replicas,
        state.log().len(),
        state.tree().num_nodes(),
        seed
    );
    debug!("authored {} moves", sim.authored);

    if args.print_tree {
        let mut paths = state
            .tree()
            .iter()
            .map(|(id, _)| display_path(state.tree(), id))
            .collect::<Result<Vec<String>>>()?;
        paths.sort();
        for path in paths {
            println!("{}", path);
        }
    }
    Ok(())
}
