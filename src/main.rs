use avl_join::avl_tree::AvlTree;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger};

fn main() {
    SimpleLogger::init(LevelFilter::Trace, Config::default()).unwrap();

    let mut tree = AvlTree::new();
    for value in &[5, 3, 8, 1, 4, 7, 9, 2, 6] {
        tree.insert(*value);
    }
    tree.remove(&3);
    print!("{}", tree);

    let (found, low, high) = AvlTree::split(tree, &5);
    info!("split at 5 (found: {}) into {:?} and {:?}", found, low, high);

    let joined = AvlTree::join(low, high, 5).unwrap();
    info!("joined height: {}", joined.height());

    let others: AvlTree<u32> = (0..32).map(|i| i * 2).collect();
    let union = AvlTree::union(joined, others);
    info!("union of {} values, height {}", union.len(), union.height());
    union.check().unwrap();
}
