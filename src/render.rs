use crate::{
    camera::Camera,
    framebuffer::{encode, FrameBuffer, COLOR_CHANNELS},
    scene::{Light, Scene},
    tracer::{TraceSettings, Tracer},
};
use anyhow::Context;
use log::{debug, info};
use rayon::prelude::*;
use std::{
    ops::Range,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Everything a render pass reads. Borrowed for the whole pass, so nothing
/// in here can change while workers are running.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub light: &'a Light,
    pub camera: &'a Camera,
    pub settings: TraceSettings,
}

/// Diagnostics for one completed pass
#[derive(Clone, Copy, Debug)]
pub struct RenderStats {
    /// Wall clock time of the whole pass, join included
    pub duration: Duration,
    /// Shading evaluations performed over all pixels
    pub evaluations: u64,
    /// Number of row bands the image was split into
    pub bands: usize,
}

impl RenderStats {
    pub fn evaluations_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.evaluations as f64 / secs
        } else {
            0.0
        }
    }
}

/// Splits rows `[0, height)` into `bands` contiguous ranges.
///
/// Every band gets `height / bands` rows and the last one takes the
/// remainder. With fewer rows than bands the first `height` bands get one
/// row each and the rest are empty.
pub fn row_bands(height: usize, bands: usize) -> Vec<Range<usize>> {
    let bands = bands.max(1);
    let size = height / bands;

    (0..bands)
        .map(|i| {
            if size == 0 {
                if i < height {
                    i..i + 1
                } else {
                    height..height
                }
            } else {
                let start = i * size;
                let end = if i == bands - 1 { height } else { start + size };
                start..end
            }
        })
        .collect()
}

/// Renders one full frame into `buffer`.
///
/// A pool of `threads` workers (0 picks the hardware concurrency) is built
/// for this pass only. Each worker owns a disjoint band of rows and the call
/// returns once all of them are done.
pub fn render(
    context: &RenderContext,
    buffer: &mut FrameBuffer,
    threads: usize,
) -> anyhow::Result<RenderStats> {
    let threads = if threads == 0 {
        rayon::current_num_threads()
    } else {
        threads
    };

    let width = buffer.width();
    let height = buffer.height();
    let bands = row_bands(height, threads);
    debug!("Rendering {}x{} in {} bands: {:?}", width, height, bands.len(), bands);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("render-band-{}", i))
        .build()
        .context("Failed to build render thread pool")?;

    let tracer = Tracer::new(context.scene, context.light, context.settings);
    let basis = context.camera.basis(width, height);
    let total = AtomicU64::new(0);
    let stride = buffer.stride();

    let start = Instant::now();

    let jobs = bands
        .iter()
        .cloned()
        .zip(buffer.split_bands_mut(&bands))
        .collect::<Vec<_>>();

    pool.install(|| {
        jobs.into_par_iter().for_each(|(rows, band)| {
            let mut evaluations = 0u64;
            if stride == 0 {
                return;
            }

            for (y, row) in rows.zip(band.chunks_mut(stride)) {
                for (x, pixel) in row.chunks_mut(COLOR_CHANNELS).enumerate() {
                    let mut count = 0;
                    let color = tracer.trace(basis.ray(x, y), 0, &mut count);
                    pixel.copy_from_slice(&encode(color));
                    evaluations += u64::from(count);
                }
            }

            total.fetch_add(evaluations, Ordering::Relaxed);
        })
    });

    let stats = RenderStats {
        duration: start.elapsed(),
        evaluations: total.load(Ordering::Relaxed),
        bands: bands.len(),
    };

    info!(
        "Time elapsed: {:.2?}, evaluations: {:.2}M, per second: {:.2}M",
        stats.duration,
        stats.evaluations as f64 / 1_000_000.0,
        stats.evaluations_per_second() / 1_000_000.0,
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::Material,
        primitives::{Instance, Sphere, Wall},
    };
    use glam::{vec3, Vec3};

    fn assert_partition(height: usize, count: usize) {
        let bands = row_bands(height, count);
        assert_eq!(bands.len(), count.max(1));

        let mut next = 0;
        let mut covered = 0;
        for band in &bands {
            if band.is_empty() {
                continue;
            }
            assert_eq!(band.start, next, "gap or overlap in {:?}", bands);
            next = band.end;
            covered += band.len();
        }
        assert_eq!(next, height);
        assert_eq!(covered, height);
    }

    #[test]
    fn bands_partition_all_rows() {
        for height in 1..40 {
            for count in 1..12 {
                assert_partition(height, count);
            }
        }
        assert_partition(800, 16);
        assert_partition(801, 7);
    }

    #[test]
    fn last_band_takes_the_remainder() {
        let bands = row_bands(10, 3);
        assert_eq!(bands, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn fewer_rows_than_bands_leaves_bands_empty() {
        let bands = row_bands(3, 8);
        assert_eq!(bands.iter().filter(|b| !b.is_empty()).count(), 3);
        assert_eq!(bands.iter().filter(|b| b.is_empty()).count(), 5);
    }

    #[test]
    fn zero_height_has_only_empty_bands() {
        assert!(row_bands(0, 4).iter().all(|b| b.is_empty()));
    }

    fn test_scene() -> Scene {
        Scene::new(vec![
            Instance::new(
                Sphere::new(vec3(0.0, 0.0, -4.0), 1.0),
                Material::new(vec3(1.0, 0.0, 0.0), 0.2),
            ),
            Instance::new(
                Wall::new(
                    vec3(0.0, -2.0, -3.0),
                    vec3(0.0, 1.0, 0.0),
                    vec3(1.0, 0.0, 0.0),
                    20.0,
                    20.0,
                ),
                Material::new(vec3(0.5, 0.3, 0.1), 0.1),
            ),
        ])
    }

    #[test]
    fn render_matches_single_threaded_trace() {
        let scene = test_scene();
        let light = Light::new(vec3(5.0, 1.0, 0.0), Vec3::one());
        let camera = Camera::default();
        let context = RenderContext {
            scene: &scene,
            light: &light,
            camera: &camera,
            settings: TraceSettings::default(),
        };

        let mut buffer = FrameBuffer::new(13, 9);
        let stats = render(&context, &mut buffer, 4).unwrap();
        assert_eq!(stats.bands, 4);
        assert!(stats.evaluations >= (buffer.width() * buffer.height()) as u64);

        let tracer = Tracer::new(&scene, &light, context.settings);
        let basis = camera.basis(buffer.width(), buffer.height());
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let mut count = 0;
                let expected = encode(tracer.trace(basis.ray(x, y), 0, &mut count));
                assert_eq!(buffer.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }

        // The sphere sits in the middle of the frame
        let center = buffer.pixel(buffer.width() / 2, buffer.height() / 2);
        assert!(center[0] > 0);
    }

    #[test]
    fn thread_count_does_not_change_the_image() {
        let scene = test_scene();
        let light = Light::new(vec3(5.0, 1.0, 0.0), Vec3::one());
        let camera = Camera::new(vec3(0.5, 0.5, 0.0), vec3(0.1, -0.2, -1.0), 15.0, 70.0);
        let context = RenderContext {
            scene: &scene,
            light: &light,
            camera: &camera,
            settings: TraceSettings::default(),
        };

        let mut single = FrameBuffer::new(16, 6);
        render(&context, &mut single, 1).unwrap();

        // More bands than rows
        let mut many = FrameBuffer::new(16, 6);
        render(&context, &mut many, 11).unwrap();

        assert_eq!(single.as_bytes(), many.as_bytes());
    }

    #[test]
    fn empty_buffer_renders_nothing() {
        let scene = test_scene();
        let light = Light::new(vec3(5.0, 1.0, 0.0), Vec3::one());
        let camera = Camera::default();
        let context = RenderContext {
            scene: &scene,
            light: &light,
            camera: &camera,
            settings: TraceSettings::default(),
        };

        let mut buffer = FrameBuffer::new(8, 0);
        let stats = render(&context, &mut buffer, 3).unwrap();
        assert_eq!(stats.evaluations, 0);

        let mut buffer = FrameBuffer::new(0, 5);
        let stats = render(&context, &mut buffer, 3).unwrap();
        assert_eq!(stats.evaluations, 0);
    }
}
