//! Manual exercise for the entropy subsystem: constructs the singletons,
//! feeds the filter a handful of synthetic input events, and prints the
//! resulting random bytes. Not a toolkit integration — a real host wires
//! its own event type into `InputEvent` and registers the filter as an
//! `EventSink` with its dispatcher.

use entropy_core::{filter_instance, random_instance, EventSink, InputEvent};

fn main() {
    env_logger::init();

    let filter = filter_instance();
    println!("filter constructed; pool length = {}", filter.pool_len());

    let synthetic_events = [
        InputEvent::MouseMove { x: 120, y: 240 },
        InputEvent::MouseMove { x: 128, y: 244 },
        InputEvent::KeyPress { code: 65 },
        InputEvent::KeyRelease { code: 65 },
        InputEvent::MouseButtonPress { x: 128, y: 244 },
        InputEvent::MouseButtonRelease { x: 128, y: 244 },
    ];

    for event in &synthetic_events {
        filter.on_event(event);
    }

    println!("pool length after demo events = {}", filter.pool_len());
    println!("reseeds so far = {}", filter.reseed_count());

    let bytes = random_instance()
        .random_array(32)
        .expect("system RNG failure");
    println!("32 random bytes: {bytes:02x?}");

    let dice = random_instance()
        .random_uint_range(1, 7)
        .expect("system RNG failure");
    println!("uniform roll in [1,7): {dice}");
}
