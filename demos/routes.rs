//! Matching request paths against a table of wildcard routes
use wildcard_dawg::PatternTree;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let routes = [
        "/api/*",
        "/api/users",
        "/api/users/?",
        "/api/users/*/posts",
        "/api/groups/*/posts",
        "/static/*.css",
        "/static/*.js",
    ];

    let tree: PatternTree = routes.iter().collect();
    println!("Route tree ({} nodes):\n{}", tree.node_count(), tree);

    // Freeze the table; identical subtrees are shared from here on
    let dag = tree.into_dag();
    println!("Route DAG ({} nodes):\n{}", dag.node_count(), dag);

    for path in ["/api/users/7", "/api/users/7/posts", "/static/site.css", "/about"] {
        println!("{} → {:?}", path, dag.find(path));
    }
}
