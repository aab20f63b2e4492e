use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tandem::math::{quantize, value_to_ratio};
use tandem::value::{ControllableValue, ExternalSlot};

const SAMPLES: usize = 10_000;

fn random_range(rng: &mut StdRng) -> (f64, f64, f64) {
    let min = rng.random_range(-1_000.0..1_000.0);
    let span: f64 = rng.random_range(0.001..2_000.0);
    let step = rng.random_range(0.001..span.max(0.002));
    (min, min + span, step)
}

#[test]
fn quantized_values_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(0x51DE);
    for _ in 0..SAMPLES {
        let (min, max, step) = random_range(&mut rng);
        let ratio = rng.random_range(-2.0..3.0);
        let value = quantize(ratio, min, max, step);
        assert!(
            (min..=max).contains(&value),
            "quantize({ratio}, {min}, {max}, {step}) = {value}"
        );
    }
}

#[test]
fn quantization_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(0xC0105);
    for _ in 0..SAMPLES {
        let (min, max, step) = random_range(&mut rng);
        let ratio = rng.random_range(0.0..1.0);
        let value = quantize(ratio, min, max, step);
        let again = quantize(*value_to_ratio(value, min, max), min, max, step);
        let tolerance = f64::EPSILON * 64. * max.abs().max(min.abs()).max(1.);
        assert!(
            (value - again).abs() <= tolerance,
            "{value} requantized to {again} ({min}..={max} by {step})"
        );
    }
}

#[test]
fn degenerate_ranges() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..SAMPLES {
        let min = rng.random_range(-100.0..100.0);
        let below = min - rng.random_range(0.0..100.0);
        let ratio = rng.random_range(-1.0..2.0);
        assert_eq!(*value_to_ratio(ratio, min, min), 0.);
        assert_eq!(quantize(ratio, min, min, 1.), min);
        assert_eq!(quantize(ratio, min, below, 1.), min);
        assert_eq!(quantize(ratio, min, f64::INFINITY, 1.), min);
    }
}

#[test]
fn repeated_writes_notify_once() {
    let mut rng = StdRng::seed_from_u64(42);
    let notified = std::sync::Arc::new(parking_lot::Mutex::new(0_usize));
    let value = ControllableValue::build(0_i32)
        .on_change({
            let notified = notified.clone();
            move |_: &i32| *notified.lock() += 1
        })
        .finish();

    let mut expected = 0;
    let mut previous = 0;
    for _ in 0..SAMPLES {
        let next = rng.random_range(0..4);
        value.write(next);
        value.write(next);
        if next != previous {
            expected += 1;
            previous = next;
        }
    }
    assert_eq!(*notified.lock(), expected);
}

#[test]
fn external_writes_never_land() {
    let mut rng = StdRng::seed_from_u64(99);
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(0.).external(slot.clone()).finish();
    for bound in [false, true] {
        if bound {
            value.init();
        }
        for _ in 0..1_000 {
            value.write(rng.random_range(-10.0..10.0));
            value.notify(rng.random_range(-10.0..10.0));
            assert_eq!(value.get(), 0.);
        }
    }

    assert!(slot.write_silent(3.));
    assert_eq!(value.get(), 3.);
}
