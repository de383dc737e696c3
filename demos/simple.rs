use truss2d::{force, point, Support, TrussModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut model = TrussModel::new();
    model.add_node(1, point(0.0, 0.0))?;
    model.add_node(2, point(1.0, 0.0))?;
    model.set_support(1, Support::PINNED)?;
    model.set_support(2, Support::ROLLER_X)?;
    model.set_load(2, force(-1000.0, 0.0))?;
    model.add_member(1, 1, 2)?;
    model.set_member_properties(1, 0.01, 200.0e9)?;

    let results = model.solve()?;

    if let Some(displacement) = results.displacements.get(&2) {
        println!("ux = {:.3e} m", displacement.x);
    }

    Ok(())
}
