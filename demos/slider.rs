use std::future::ready;
use std::thread;
use std::time::Duration;

use tandem::context::Background;
use tandem::pointer::BoundingClientRect;
use tandem::range::SliderRange;
use tandem::view::Node;
use tandem::widgets::{Slider, SliderNodes};
use tracing::info;

fn main() {
    tandem::initialize_tracing();

    // Application state lives on a deliberately slow context.
    let app = Background::named("app-state", 32);
    let on_change = app.run_on_background(|value: f64| {
        thread::sleep(Duration::from_millis(5));
        info!(value, "app saw change");
    });
    let on_commit = app.run_on_background(|value: f64| info!(value, "app saw commit"));

    let thumb = Node::new("thumb");
    let slider = Slider::new(SliderRange::new(0., 100.).step(5.))
        .initial_value(50.)
        .on_change(move |value| on_change(&value))
        .on_commit(move |value| on_commit(&value))
        .build();
    slider.mount(SliderNodes {
        root: Node::new("root"),
        track: Node::new("track"),
        thumb: thumb.clone(),
    });

    // The fast context handles layout and pointer input without waiting on
    // the app.
    let fast = thread::spawn({
        let slider = slider.clone();
        move || {
            pollster::block_on(slider.track_layout_changed(
                300.,
                ready(Ok(BoundingClientRect::horizontal(10., 300.))),
            ));
            slider.pointer_down(160.);
            for x in (160..=310).step_by(10) {
                slider.pointer_move(f64::from(x));
            }
            slider.pointer_up(310.);
        }
    });
    if fast.join().is_err() {
        return;
    }

    info!(
        value = slider.value(),
        thumb = %thumb.style("left").unwrap_or_default(),
        "drag finished on the fast context"
    );
    app.flush();
}
