use std::future::ready;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tandem::color::HslColor;
use tandem::context::Background;
use tandem::pointer::BoundingClientRect;
use tandem::styles::BACKGROUND_IMAGE;
use tandem::view::Node;
use tandem::widgets::{ColorPicker, HslSlots, PickerNodes, SliderNodes};
use tracing::info;

fn slider_nodes(name: &str) -> (SliderNodes, Arc<Node>) {
    let track = Node::new(format!("{name}-track"));
    (
        SliderNodes {
            root: Node::new(format!("{name}-root")),
            track: track.clone(),
            thumb: Node::new(format!("{name}-thumb")),
        },
        track,
    )
}

fn main() {
    tandem::initialize_tracing();

    // The app owns the color and is slow to accept changes. Proposals that
    // arrive while its queue is full are dropped, not waited on.
    let app = Background::named("app-state", 8);
    let slots = HslSlots::new();
    let accept = app.run_on_background({
        let slots = slots.clone();
        move |color: HslColor| {
            thread::sleep(Duration::from_millis(20));
            slots.write_silent(color);
        }
    });
    let commit = app.run_on_background(|color: HslColor| {
        let [red, green, blue] = color.to_rgb();
        info!(%color, "committed #{red:02x}{green:02x}{blue:02x}");
    });

    let picker = ColorPicker::default()
        .controlled_by(slots)
        .on_hsl_change(move |color| accept(&color))
        .on_hsl_commit(move |color| commit(&color))
        .build();
    let (hue, _) = slider_nodes("hue");
    let (saturation, saturation_track) = slider_nodes("saturation");
    let (lightness, _) = slider_nodes("lightness");
    picker.mount(PickerNodes {
        hue,
        saturation,
        lightness,
    });

    let fast = thread::spawn({
        let picker = picker.clone();
        move || {
            let hue = picker.hue().slider();
            pollster::block_on(
                hue.track_layout_changed(360., ready(Ok(BoundingClientRect::horizontal(0., 360.)))),
            );
            hue.pointer_down(199.);
            for x in (199..=280).step_by(3) {
                hue.pointer_move(f64::from(x));
                thread::sleep(Duration::from_millis(2));
            }
            hue.pointer_up(280.);
        }
    });
    if fast.join().is_err() {
        return;
    }
    app.flush();

    info!(color = %picker.color(), "picker settled");
    info!(
        gradient = %saturation_track.style(BACKGROUND_IMAGE).unwrap_or_default(),
        "saturation track"
    );
}
