use embedded_raster::{DecodeOptions, decode, rle};
use proptest::prelude::*;

/// Runs of `(count, color)` covering a whole image.
fn runs() -> impl Strategy<Value = (usize, usize, Vec<(u8, u8)>)> {
    (1usize..40, 1usize..40).prop_flat_map(|(width, height)| {
        let total = width * height;
        prop::collection::vec((1u8..=63, 0u8..=1), 1..=total).prop_map(move |mut runs| {
            // Trim or extend the runs so the counts sum to exactly `total`
            let mut sum = 0usize;
            let mut kept = Vec::new();
            for (count, color) in runs.drain(..) {
                if sum == total {
                    break;
                }
                let count = (count as usize).min(total - sum) as u8;
                sum += count as usize;
                kept.push((count, color));
            }
            while sum < total {
                let count = (total - sum).min(63) as u8;
                sum += count as usize;
                kept.push((count, 1));
            }
            (width, height, kept)
        })
    })
}

fn expand(runs: &[(u8, u8)]) -> Vec<u8> {
    runs.iter()
        .flat_map(|&(count, color)| std::iter::repeat_n(color, count as usize))
        .collect()
}

proptest! {
    #[test]
    fn z2_round_trip((width, height, runs) in runs()) {
        let pixels = expand(&runs);
        let mut body = b"Z2".to_vec();
        body.extend(rle::encode(&pixels));

        let bitmap = decode(&body[..], &DecodeOptions::new(width, height))
            .unwrap()
            .into_bitmap();
        prop_assert_eq!(bitmap.pixels(), &pixels[..]);
    }

    #[test]
    fn z2_overshoot_stops_at_bound(
        (width, height, runs) in runs(),
        extra in prop::collection::vec((1u8..=63, 0u8..=1), 1..8),
    ) {
        let pixels = expand(&runs);
        let mut body = b"Z2".to_vec();
        for &(count, color) in runs.iter().chain(extra.iter()) {
            body.push(color << 6 | count);
        }

        let bitmap = decode(&body[..], &DecodeOptions::new(width, height))
            .unwrap()
            .into_bitmap();
        prop_assert_eq!(bitmap.pixels().len(), width * height);
        prop_assert_eq!(bitmap.pixels(), &pixels[..]);
    }

    #[test]
    fn z2_arbitrary_chunking_matches(
        (width, height, runs) in runs(),
        poll_size in 1usize..600,
    ) {
        let pixels = expand(&runs);
        let mut body = b"Z2".to_vec();
        body.extend(rle::encode(&pixels));

        let mut options = DecodeOptions::new(width, height);
        options.poll_size = poll_size;
        let bitmap = decode(&body[..], &options).unwrap().into_bitmap();
        prop_assert_eq!(bitmap.pixels(), &pixels[..]);
    }
}
