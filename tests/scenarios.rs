use std::future::ready;
use std::sync::Arc;

use parking_lot::Mutex;
use tandem::color::{Channel, HslColor};
use tandem::context::Background;
use tandem::pointer::BoundingClientRect;
use tandem::range::SliderRange;
use tandem::styles::BACKGROUND_IMAGE;
use tandem::value::ExternalSlot;
use tandem::view::Node;
use tandem::widgets::{ColorPicker, HslSlots, PickerNodes, Slider, SliderHandle, SliderNodes};

fn nodes(prefix: &str) -> (SliderNodes, Arc<Node>, Arc<Node>, Arc<Node>) {
    let root = Node::new(format!("{prefix}-root"));
    let track = Node::new(format!("{prefix}-track"));
    let thumb = Node::new(format!("{prefix}-thumb"));
    (
        SliderNodes {
            root: root.clone(),
            track: track.clone(),
            thumb: thumb.clone(),
        },
        root,
        track,
        thumb,
    )
}

fn lay_out(slider: &SliderHandle, left: f64, width: f64) {
    pollster::block_on(slider.track_layout_changed(
        width,
        ready(Ok(BoundingClientRect::horizontal(left, width))),
    ));
}

fn recorder() -> (Arc<Mutex<Vec<f64>>>, impl Fn(f64) + Send + Sync + Clone + 'static) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let log = log.clone();
        move |value: f64| log.lock().push(value)
    };
    (log, sink)
}

#[test]
fn slider_drag() {
    let (changes, on_change) = recorder();
    let (commits, on_commit) = recorder();
    let slider = Slider::new(SliderRange::new(0., 360.).step(1.))
        .on_change(on_change)
        .on_commit(on_commit)
        .build();
    let (nodes, _, _, thumb) = nodes("slider");
    slider.mount(nodes);
    lay_out(&slider, 20., 400.);

    slider.pointer_down(220.);
    assert_eq!(slider.value(), 180.);
    assert_eq!(*changes.lock(), [180.]);

    slider.pointer_move(320.);
    assert_eq!(slider.value(), 270.);
    assert_eq!(*changes.lock(), [180., 270.]);
    assert_eq!(thumb.style("left").as_deref(), Some("75%"));

    slider.pointer_up(320.);
    assert_eq!(*commits.lock(), [270.]);
    assert_eq!(*changes.lock(), [180., 270.]);
}

#[test]
fn pre_layout_touch_is_dropped() {
    let (changes, on_change) = recorder();
    let slider = Slider::new(SliderRange::new(0., 100.))
        .on_change(on_change)
        .build();
    let (nodes, ..) = nodes("slider");
    slider.mount(nodes);

    let pending = slider.track_layout_changed(100., ready(Ok(BoundingClientRect::horizontal(0., 100.))));
    assert_eq!(slider.pointer_down(50.), None);
    assert!(changes.lock().is_empty());
    assert_eq!(slider.value(), 0.);

    // Once layout settles, the same gesture continues normally.
    pollster::block_on(pending);
    slider.pointer_move(50.);
    assert_eq!(*changes.lock(), [50.]);
}

#[test]
fn externally_owned_slider_waits_for_its_owner() {
    let slot = ExternalSlot::new();
    let (proposals, on_change) = recorder();
    let slider = Slider::new(SliderRange::new(0., 10.))
        .controlled_by(slot.clone())
        .on_change(on_change)
        .build();
    let (nodes, _, _, thumb) = nodes("owned");
    slider.mount(nodes);
    lay_out(&slider, 0., 100.);

    slider.pointer_down(50.);
    assert_eq!(*proposals.lock(), [5.]);
    assert_eq!(slider.value(), 0.);
    assert_eq!(thumb.style("left").as_deref(), Some("0%"));

    // The owner accepts the proposal.
    assert!(slot.write_silent(5.));
    assert_eq!(slider.value(), 5.);
    assert_eq!(thumb.style("left").as_deref(), Some("50%"));
    assert_eq!(proposals.lock().len(), 1);

    slider.unmount();
    assert!(!slot.is_bound());
}

#[test]
fn color_picker_fan_out() {
    let picker = ColorPicker::new(HslColor::new(0., 100., 50.)).build();
    let (hue, ..) = nodes("hue");
    let (saturation, _, saturation_track, _) = nodes("saturation");
    let (lightness, _, lightness_track, _) = nodes("lightness");
    picker.mount(PickerNodes {
        hue,
        saturation,
        lightness,
    });
    lay_out(picker.hue().slider(), 0., 360.);

    picker.hue().slider().pointer_down(120.);
    assert_eq!(picker.hue().value(), 120.);
    assert_eq!(picker.color(), HslColor::new(120., 100., 50.));

    assert_eq!(picker.saturation().others(), (120., 50.));
    assert_eq!(picker.lightness().others(), (120., 100.));
    assert_eq!(
        saturation_track.style(BACKGROUND_IMAGE).as_deref(),
        Some("linear-gradient(to right, hsl(120, 0%, 50%), hsl(120, 100%, 50%))")
    );
    assert_eq!(
        lightness_track.style(BACKGROUND_IMAGE).as_deref(),
        Some(
            "linear-gradient(to right, hsl(120, 100%, 0%), hsl(120, 100%, 50%), \
             hsl(120, 100%, 100%))"
        )
    );

    // The siblings repainted without their own values changing.
    assert_eq!(picker.saturation().value(), 100.);
    assert_eq!(picker.lightness().value(), 50.);
    // The hue slider's own gradients depend only on saturation and lightness.
    assert_eq!(picker.hue().others(), (100., 50.));
}

#[test]
fn color_picker_reports_full_colors() {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let commits = Arc::new(Mutex::new(Vec::new()));
    let picker = ColorPicker::default()
        .on_hsl_change({
            let changes = changes.clone();
            move |color: HslColor| changes.lock().push(color.to_array())
        })
        .on_hsl_commit({
            let commits = commits.clone();
            move |color: HslColor| commits.lock().push(color.to_array())
        })
        .build();
    let (lightness, ..) = nodes("lightness");
    picker.lightness().mount(lightness);
    lay_out(picker.lightness().slider(), 0., 100.);

    picker.lightness().slider().pointer_down(30.);
    picker.lightness().slider().pointer_up(40.);
    assert_eq!(*changes.lock(), [[199., 99., 30.], [199., 99., 40.]]);
    assert_eq!(*commits.lock(), [[199., 99., 40.]]);
}

#[test]
fn background_owner_drives_the_picker() {
    let background = Background::spawn();
    let slots = HslSlots::new();
    let accepted = Arc::new(Mutex::new(Vec::new()));
    let accept = background.run_on_background({
        let slots = slots.clone();
        let accepted = accepted.clone();
        move |color: HslColor| {
            accepted.lock().push(color);
            slots.write_silent(color);
        }
    });
    let picker = ColorPicker::default()
        .controlled_by(slots.clone())
        .on_hsl_change(move |color| accept(&color))
        .build();
    let (hue, ..) = nodes("hue");
    let (saturation, _, saturation_track, _) = nodes("saturation");
    let (lightness, ..) = nodes("lightness");
    picker.mount(PickerNodes {
        hue,
        saturation,
        lightness,
    });
    lay_out(picker.hue().slider(), 0., 360.);

    picker.hue().slider().pointer_down(90.);
    // Nothing lands until the background context accepts the proposal.
    assert!(background.flush());
    assert_eq!(*accepted.lock(), [HslColor::new(90., 99., 72.)]);
    assert_eq!(picker.hue().value(), 90.);
    assert_eq!(picker.color().channel(Channel::Hue), 90.);
    assert!(saturation_track
        .style(BACKGROUND_IMAGE)
        .is_some_and(|gradient| gradient.contains("hsl(90, 0%, 72%)")));
}
