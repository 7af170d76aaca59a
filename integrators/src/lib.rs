//! Integrators and the render session.

#[macro_use]
extern crate log;

mod camera;
mod film;
mod naive;
mod path;
mod scene;

pub use camera::*;
pub use film::*;
pub use naive::*;
pub use path::*;
pub use scene::*;

use core::base::*;
use core::geometry::Ray;
use core::sampler::{IndependentSampler, Sampler};
use core::spectrum::Spectrum;
use indicatif::ProgressBar;

/// Options for one render invocation. The session owns its worker pool and
/// queue; nothing here is global state.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Radiance samples per pixel.
    pub samples_per_pixel: u32,

    /// Worker threads; 0 selects the available parallelism.
    pub threads: usize,

    /// Global seed. Fixing it makes renders bit-for-bit reproducible.
    pub seed: u64,

    /// Scanlines per work item.
    pub rows_per_job: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            threads: 0,
            seed: 0,
            rows_per_job: 4,
        }
    }
}

/// Mixes the global seed with a scanline index into a sampler seed. Every
/// row owns an independent sampler stream, so the image is identical for
/// any thread count or job partition.
fn row_seed(seed: u64, y: u32) -> u64 {
    (seed ^ (y as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)).wrapping_mul(0x2545_f491_4f6c_dd1d)
}

/// A radiance estimator driven by a stream of samples. `li` is the unit
/// the statistical tests run against; `render` drives the full per-pixel
/// loop over an owned scanline-range work queue.
pub trait Integrator: Sync {
    /// Single-sample estimate of the radiance arriving along the ray.
    ///
    /// * `scene`   - The scene.
    /// * `ray`     - The primary ray.
    /// * `sampler` - Random value stream for this estimate.
    fn li(&self, scene: &Scene, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum;

    /// Renders the scene into the film. The scene is shared immutably
    /// across workers; each scanline renders with its own seeded sampler
    /// into a worker-local tile, merged on the session thread.
    ///
    /// * `scene`   - The scene.
    /// * `camera`  - Primary ray generator.
    /// * `film`    - Accumulation target.
    /// * `options` - Render options.
    fn render(
        &self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        film: &mut Film,
        options: &RenderOptions,
    ) where
        Self: Sized,
    {
        let width = film.width();
        let height = film.height();
        let spp = options.samples_per_pixel;

        let threads = if options.threads > 0 {
            options.threads
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        };

        // Contiguous scanline ranges form the work queue.
        let rows_per_job = max(1, options.rows_per_job);
        let jobs: Vec<(u32, u32)> = (0..height)
            .step_by(rows_per_job as usize)
            .map(|y0| (y0, min(y0 + rows_per_job, height)))
            .collect();

        info!("rendering {width}x{height} at {spp} spp on {threads} threads");
        let progress = ProgressBar::new(jobs.len() as u64);

        std::thread::scope(|scope| {
            let (job_tx, job_rx) = crossbeam_channel::bounded::<(u32, u32)>(jobs.len());
            let (tile_tx, tile_rx) = crossbeam_channel::unbounded::<FilmTile>();

            for _ in 0..threads {
                let job_rx = job_rx.clone();
                let tile_tx = tile_tx.clone();
                let progress = progress.clone();
                scope.spawn(move || {
                    for (y0, y1) in job_rx.iter() {
                        let mut tile = FilmTile::new(y0, y1, width);
                        for y in y0..y1 {
                            let mut sampler = IndependentSampler::new(row_seed(options.seed, y));
                            for x in 0..width {
                                for _ in 0..spp {
                                    let u = (x as Float + sampler.next_1d()) / width as Float;
                                    // Film row 0 is the top scanline.
                                    let v = 1.0
                                        - (y as Float + sampler.next_1d()) / height as Float;
                                    let ray = camera.generate_ray(u, v);
                                    let l = self.li(scene, &ray, &mut sampler);
                                    tile.add_sample(x, y, l);
                                }
                            }
                        }
                        tile_tx.send(tile).expect("film tile channel closed");
                        progress.inc(1);
                    }
                });
            }
            drop(job_rx);
            drop(tile_tx);

            for job in jobs {
                job_tx.send(job).expect("job channel closed");
            }
            drop(job_tx);

            for tile in tile_rx.iter() {
                film.merge_tile(tile);
            }
        });

        progress.finish_and_clear();
    }
}
