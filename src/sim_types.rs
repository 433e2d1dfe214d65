use sn_tree::{Clock, LogOpMove, OpMove, State, Tree, TreeReplica};

pub type ActorType = u64;
pub type TreeIdType = u64;
pub type TreeMetaType = String;

pub type SimClock = Clock<ActorType>;
pub type SimState = State<TreeIdType, TreeMetaType, SimClock>;
pub type SimTree = Tree<TreeIdType, TreeMetaType>;
pub type SimOpMove = OpMove<TreeIdType, TreeMetaType, SimClock>;
pub type SimLogOpMove = LogOpMove<TreeIdType, TreeMetaType, SimClock>;
pub type SimReplica = TreeReplica<TreeIdType, TreeMetaType, ActorType>;
