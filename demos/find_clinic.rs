//! Searches the bundled clinic list for an NHS practice with orthodontics and
//! Polish-speaking staff, then prints the first page with zones.

use dentalsearch::prelude::*;

fn main() -> Result<(), Error> {
  let clinics = EmbeddedSource::new().load()?;
  let catalog = FacetCatalog::from_clinics(&clinics);
  println!("{} services, {} languages on offer", catalog.services.len(), catalog.languages.len());

  let criteria = SearchCriteria::builder()
    .service("Orthodontics")
    .language("Polish")
    .require(Feature::Nhs)
    .page_size(5)
    .build();

  let matcher = ClinicMatcher::new();
  let page = matcher.search(&clinics, &criteria);

  let (start, end) = page.showing();
  println!("Showing {start}-{end} of {}", page.total);
  for m in &page.results {
    let zone = zone_of(m.clinic).map(|z| z.to_string()).unwrap_or_else(|| "no zone".to_string());
    println!(
      "{:>3}  {:<36} {:<8} {}",
      m.score,
      m.clinic.display_name(),
      zone,
      m.detail_strings().join(", ")
    );
  }

  Ok(())
}
