use std::io;
use std::path::PathBuf;

use crate::FailResult;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        for cause in e.iter_chain() {
            eprintln!("ERROR: {}", cause);
        }
        ::std::process::exit(2);
    });
}

// %% CRATES: binary: numlab-multiply %%
pub fn multiply() {
    wrap_result_main(|| {
        env_logger::init();

        let app = clap::App::new("numlab-multiply")
            .about("Computes C = A*B for dense matrices with BLAS dgemm.")
            .args(&[
                clap::Arg::with_name("input").value_name("INPUT").required(true)
                    .help("text file: an 'm n l' header, then A (m x n), then B (n x l)"),
                clap::Arg::with_name("output").value_name("OUTPUT").required(true)
                    .help("destination for C (m x l), same text format"),
            ]);
        let matches = app.get_matches();
        let input = PathBuf::from(matches.value_of_os("input").unwrap());
        let output = PathBuf::from(matches.value_of_os("output").unwrap());

        crate::cmd::multiply::run(&input, &output)
    });
}

// %% CRATES: binary: numlab-svd %%
pub fn svd() {
    wrap_result_main(|| {
        env_logger::init();

        let app = clap::App::new("numlab-svd")
            .about("Singular value decomposition (LAPACK dgesvd) with a reconstruction check.")
            .args(&[
                clap::Arg::with_name("input").value_name("INPUT")
                    .help("matrix file ('rows cols' header, then entries); \
                           a built-in 2x2 demo is used when omitted"),
            ]);
        let matches = app.get_matches();
        let input = matches.value_of_os("input").map(PathBuf::from);

        let stdout = io::stdout();
        crate::cmd::svd::run(input.as_deref(), &mut stdout.lock())
    });
}

// %% CRATES: binary: numlab-fit-linear %%
pub fn fit_linear() {
    wrap_result_main(|| {
        env_logger::init();

        let app = clap::App::new("numlab-fit-linear")
            .about("Least-squares line fit via the normal equations (LAPACK dgesv).")
            .args(&[
                clap::Arg::with_name("points").value_name("POINTS")
                    .help("sample file, one 'x y' pair per line; \
                           built-in demo data is used when omitted"),
            ]);
        let matches = app.get_matches();
        let points = matches.value_of_os("points").map(PathBuf::from);

        let stdout = io::stdout();
        crate::cmd::fit::run_linear(points.as_deref(), &mut stdout.lock())
    });
}

// %% CRATES: binary: numlab-fit-quadratic %%
pub fn fit_quadratic() {
    wrap_result_main(|| {
        env_logger::init();

        let app = clap::App::new("numlab-fit-quadratic")
            .about("Least-squares quadratic fit via QR (LAPACK dgels), with CSV export.")
            .args(&[
                clap::Arg::with_name("points").value_name("POINTS")
                    .help("sample file, one 'x y' pair per line; \
                           built-in demo data is used when omitted"),
                clap::Arg::with_name("csv").long("csv").value_name("PATH")
                    .takes_value(true).default_value("fit.csv")
                    .help("destination for the plotting table"),
            ]);
        let matches = app.get_matches();
        let points = matches.value_of_os("points").map(PathBuf::from);
        let csv = PathBuf::from(matches.value_of_os("csv").unwrap());

        let stdout = io::stdout();
        crate::cmd::fit::run_quadratic(points.as_deref(), &csv, &mut stdout.lock())
    });
}
