/*!
 * Authentication context extractor
 *
 * The gate middleware stores the verified `Principal` in request extensions; handlers take
 * `CurrentPrincipal` to read it.
 */

mod principal;

pub use principal::CurrentPrincipal;
