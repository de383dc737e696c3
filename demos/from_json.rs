use truss2d::TrussModel;

const MODEL: &str = r#"{
    "nodes": {
        "1": {"x": 0.0, "y": 0.0},
        "2": {"x": 4.0, "y": 0.0},
        "3": {"x": 8.0, "y": 0.0},
        "4": {"x": 2.0, "y": 3.0},
        "5": {"x": 6.0, "y": 3.0}
    },
    "elements": {
        "1": {"start": 1, "end": 2},
        "2": {"start": 2, "end": 3},
        "3": {"start": 4, "end": 5},
        "4": {"start": 1, "end": 4},
        "5": {"start": 4, "end": 2},
        "6": {"start": 2, "end": 5},
        "7": {"start": 5, "end": 3}
    },
    "materials": {"1": 200e9, "2": 200e9, "3": 200e9, "4": 200e9, "5": 200e9, "6": 200e9, "7": 200e9},
    "sections": {"1": 0.002, "2": 0.002, "3": 0.002, "4": 0.002, "5": 0.002, "6": 0.002, "7": 0.002},
    "loads": {"2": {"x": 0.0, "y": -50000.0}},
    "supports": {"1": {"x": 1, "y": 1}, "3": {"x": 0, "y": 1}}
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let model = TrussModel::from_json(MODEL)?;
    let results = model.solve()?;

    for (member, force) in &results.axial_forces {
        println!("member {member}: {force:+.1} N");
    }
    if let Some((node, displacement)) = results.max_displacement() {
        println!("largest displacement {:.3e} m at node {node}", displacement.magnitude());
    }

    Ok(())
}
