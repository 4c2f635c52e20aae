//! Scratch Card entry point
//!
//! Headless demo: deals a card, drags a zig-zag across it, lets the
//! auto-scratch sweeps play out and reports what happened.
//!
//! Usage: `scratch-card [settings.json] [out.png]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use glam::Vec2;
    use scratch_card::Settings;
    use scratch_card::consts::SIM_DT;
    use scratch_card::sim::{GameEvent, PointerInput, ScratchGame};

    env_logger::init();
    log::info!("Scratch Card (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let png_path = args.next();

    let mut game = ScratchGame::new(settings, None)?;
    let (width, height) = game.surface().size();
    let (width, height) = (width as f32, height as f32);

    // Zig-zag drag: rows a line-width apart, alternating direction
    let spacing = game.settings().line_width;
    let step = spacing / 2.0;
    let mut y = spacing / 2.0;
    let mut rightward = true;
    game.pointer_down(Vec2::new(0.0, y));
    while y < height {
        let (from, to) = if rightward { (0.0, width) } else { (width, 0.0) };
        let mut x = from;
        while (rightward && x < to) || (!rightward && x > to) {
            x = if rightward { (x + step).min(to) } else { (x - step).max(to) };
            game.pointer_move(PointerInput {
                position: Vec2::new(x, y),
                is_down: true,
            });
        }
        y += spacing * 2.0;
        rightward = !rightward;
        game.pointer_move(PointerInput {
            position: Vec2::new(x, y.min(height)),
            is_down: true,
        });
    }
    game.pointer_up();

    // Frame loop at 60 Hz until every sweep is done
    let mut frames = 0u32;
    while game.is_auto_scratching() {
        game.update(SIM_DT * 2.0);
        frames += 1;
    }
    log::info!("Sweeps finished after {} frames ({} ticks)", frames, game.time_ticks());

    let mut sparkles = 0usize;
    for event in game.drain_events() {
        match event {
            GameEvent::SparkleRequested { .. } => sparkles += 1,
            GameEvent::Scratched { .. } => {}
            other => log::info!("{:?}", other),
        }
    }
    log::info!("{} sweep sparkles requested", sparkles);

    for (index, cell) in game.grid().cells().iter().enumerate() {
        println!(
            "cell {index}: {:<10} {:>6.1}%",
            cell.item.map_or("-", |item| item.as_str()),
            cell.percent_complete()
        );
    }
    println!(
        "seed {} -> {:?}, {} of {} items complete",
        game.seed(),
        game.outcome(),
        game.items_complete(),
        game.grid().cells().len()
    );

    if let Some(path) = png_path {
        game.surface().snapshot().save(&path)?;
        log::info!("Wrote cover snapshot to {}", path);
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
